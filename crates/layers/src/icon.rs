//! Inline vector markup for the animated direction icon.

/// Arrowhead glyph centered in the 500x500 viewBox, pointing north at
/// heading 0 so the rotation transform can take the heading directly.
const DIRECTION_GLYPH: &str = "M250,60 L340,330 L250,270 L160,330 Z";

/// Builds the icon markup with the heading rotation and fill color baked
/// into the markup string.
pub fn direction_icon(heading_deg: f64, fill: &str) -> String {
    format!(
        concat!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" ",
            "width=\"30px\" height=\"30px\" viewBox=\"0 0 500 500\">",
            "<path transform=\"rotate({heading} 250 250)\" fill=\"{fill}\" d=\"{glyph}\"/>",
            "</svg>"
        ),
        heading = heading_deg,
        fill = fill,
        glyph = DIRECTION_GLYPH,
    )
}

/// Percent-encodes markup into a `data:` URL. Hash characters in color
/// values must not survive as URL fragments.
pub fn icon_data_url(markup: &str) -> String {
    let mut encoded = String::with_capacity(markup.len() + 24);
    encoded.push_str("data:image/svg+xml,");
    for ch in markup.chars() {
        match ch {
            '#' => encoded.push_str("%23"),
            '"' => encoded.push_str("%22"),
            '<' => encoded.push_str("%3C"),
            '>' => encoded.push_str("%3E"),
            ' ' => encoded.push_str("%20"),
            _ => encoded.push(ch),
        }
    }
    encoded
}
