//! Text form of fill paints: `#rrggbb[aa]` or
//! `linear-gradient(x1 y1 x2 y2 #color@t #color@t ...)`.

use std::fmt::Write as _;

use folio_paint::coords::Point;
use folio_paint::paint::{Color, ColorStop, LinearGradient, Paint};

pub fn format_paint(paint: &Paint) -> String {
    match paint {
        Paint::Solid(color) => color.to_string(),
        Paint::LinearGradient(g) => {
            let mut s = format!(
                "linear-gradient({} {} {} {}",
                g.start.x, g.start.y, g.end.x, g.end.y
            );
            for stop in &g.stops {
                let _ = write!(s, " {}@{}", stop.color, stop.t);
            }
            s.push(')');
            s
        }
    }
}

pub fn parse_paint(s: &str) -> Result<Paint, String> {
    let s = s.trim();
    let Some(args) = s
        .strip_prefix("linear-gradient(")
        .and_then(|rest| rest.strip_suffix(')'))
    else {
        return s.parse::<Color>().map(Paint::Solid).map_err(|e| e.to_string());
    };

    let mut parts = args.split_whitespace();
    let mut coord = || -> Result<i32, String> {
        let raw = parts.next().ok_or("gradient needs x1 y1 x2 y2")?;
        raw.parse().map_err(|_| format!("'{raw}' is not an integer"))
    };
    let start = Point::new(coord()?, coord()?);
    let end = Point::new(coord()?, coord()?);

    let stops = parts
        .map(|stop| {
            let (color, t) = stop
                .split_once('@')
                .ok_or_else(|| format!("gradient stop '{stop}' is not color@offset"))?;
            let color = color.parse::<Color>().map_err(|e| e.to_string())?;
            let t = t.parse::<f32>().map_err(|_| format!("'{t}' is not a number"))?;
            Ok(ColorStop::new(t, color))
        })
        .collect::<Result<Vec<_>, String>>()?;

    let gradient = LinearGradient::new(start, end, stops);
    if !gradient.is_valid() {
        return Err(format!("degenerate gradient '{s}'"));
    }
    Ok(Paint::LinearGradient(gradient))
}
