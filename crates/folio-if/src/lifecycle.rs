use crate::error::IfError;

/// Where a document handler is in the document call sequence.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Document,
    PageSequence,
    Page,
    Content,
    Finished,
}

impl Phase {
    /// Used in error messages: "start_page() is not allowed {description}".
    pub fn description(self) -> &'static str {
        match self {
            Phase::Idle => "before start_document()",
            Phase::Document => "outside a page sequence",
            Phase::PageSequence => "outside a page",
            Phase::Page => "outside page content",
            Phase::Content => "inside page content",
            Phase::Finished => "after end_document()",
        }
    }
}

/// Enforces
/// `start_document → (start_page_sequence → (start_page → start_page_content
/// → end_page_content → end_page)* → end_page_sequence)* → end_document`.
#[derive(Debug, Default)]
pub struct Lifecycle {
    phase: Phase,
}

impl Lifecycle {
    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Moves from `expected` to `next`, or fails naming `call`.
    pub fn advance(&mut self, call: &'static str, expected: Phase, next: Phase) -> Result<(), IfError> {
        if self.phase != expected {
            return Err(IfError::State { call, phase: self.phase.description() });
        }
        self.phase = next;
        Ok(())
    }

    pub fn start_document(&mut self) -> Result<(), IfError> {
        self.advance("start_document", Phase::Idle, Phase::Document)
    }

    pub fn start_page_sequence(&mut self) -> Result<(), IfError> {
        self.advance("start_page_sequence", Phase::Document, Phase::PageSequence)
    }

    pub fn start_page(&mut self) -> Result<(), IfError> {
        self.advance("start_page", Phase::PageSequence, Phase::Page)
    }

    pub fn start_page_content(&mut self) -> Result<(), IfError> {
        self.advance("start_page_content", Phase::Page, Phase::Content)
    }

    pub fn end_page_content(&mut self) -> Result<(), IfError> {
        self.advance("end_page_content", Phase::Content, Phase::Page)
    }

    pub fn end_page(&mut self) -> Result<(), IfError> {
        self.advance("end_page", Phase::Page, Phase::PageSequence)
    }

    pub fn end_page_sequence(&mut self) -> Result<(), IfError> {
        self.advance("end_page_sequence", Phase::PageSequence, Phase::Document)
    }

    pub fn end_document(&mut self) -> Result<(), IfError> {
        self.advance("end_document", Phase::Document, Phase::Finished)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_sequence_is_accepted() {
        let mut l = Lifecycle::default();
        l.start_document().unwrap();
        l.start_page_sequence().unwrap();
        for _ in 0..2 {
            l.start_page().unwrap();
            l.start_page_content().unwrap();
            l.end_page_content().unwrap();
            l.end_page().unwrap();
        }
        l.end_page_sequence().unwrap();
        l.end_document().unwrap();
        assert_eq!(l.phase(), Phase::Finished);
    }

    #[test]
    fn out_of_order_call_is_rejected() {
        let mut l = Lifecycle::default();
        l.start_document().unwrap();
        let err = l.start_page().unwrap_err();
        assert_eq!(err.to_string(), "start_page() is not allowed outside a page sequence");
        assert_eq!(l.phase(), Phase::Document);
    }

    #[test]
    fn nothing_after_the_end() {
        let mut l = Lifecycle::default();
        l.start_document().unwrap();
        l.end_document().unwrap();
        assert!(matches!(l.start_document(), Err(IfError::State { call: "start_document", .. })));
    }
}
