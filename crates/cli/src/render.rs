use docqa_core::Fragment;
use serde::Serialize;

const PREVIEW_CHARS: usize = 80;

#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FragmentSummary {
    Text { chars: usize, preview: String },
    Image { width: u32, height: u32 },
}

pub fn summarize(fragment: &Fragment) -> FragmentSummary {
    match fragment {
        Fragment::Text(text) => FragmentSummary::Text {
            chars: text.chars().count(),
            preview: preview(text),
        },
        Fragment::Image(img) => FragmentSummary::Image {
            width: img.width(),
            height: img.height(),
        },
    }
}

fn preview(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > PREVIEW_CHARS {
        let cut: String = flat.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", cut)
    } else {
        flat
    }
}

pub fn line(summary: &FragmentSummary) -> String {
    match summary {
        FragmentSummary::Text { chars, preview } => format!("text  {:>7} chars  {}", chars, preview),
        FragmentSummary::Image { width, height } => format!("image {}x{}", width, height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_text_is_truncated_on_char_boundaries() {
        let text = "é".repeat(200);
        match summarize(&Fragment::Text(text)) {
            FragmentSummary::Text { chars, preview } => {
                assert_eq!(chars, 200);
                assert_eq!(preview.chars().count(), PREVIEW_CHARS + 3);
                assert!(preview.ends_with("..."));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn images_report_dimensions() {
        let img = image::DynamicImage::new_rgb8(5, 7);
        let summary = summarize(&Fragment::Image(img));
        assert_eq!(line(&summary), "image 5x7");
        assert_eq!(
            serde_json::to_value(&summary).unwrap(),
            serde_json::json!({"kind": "image", "width": 5, "height": 7})
        );
    }
}
