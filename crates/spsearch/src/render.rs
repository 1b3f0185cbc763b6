//! Plain-text rendering of classification hierarchies

use redlist_codes::{CodeEntry, CodeHierarchy, Details, Dictionaries};

/// Render a hierarchy one entry per line, indented below its codepoint
///
/// Branch headers are synthesized where the API returned only descendants.
/// With a `language`, titles are replaced by dictionary text when present.
pub fn render_hierarchy(
    hierarchy: &CodeHierarchy,
    dictionaries: &Dictionaries,
    language: Option<&str>,
) -> String {
    let depth = hierarchy.codepoint_segments().len();
    let mut out = String::new();

    for entry in hierarchy.iter_with_synthetic_parents() {
        let indent = entry.code().segments().len().saturating_sub(depth + 1);
        let text = language
            .and_then(|lang| dictionaries.translate(&entry, lang))
            .or_else(|| entry.title())
            .unwrap_or("");

        out.push_str(&"  ".repeat(indent));
        out.push_str(entry.code().as_str());
        if !text.is_empty() {
            out.push(' ');
            out.push_str(text);
        }
        if let Some(details) = detail_summary(&entry) {
            out.push_str(&format!(" [{}]", details));
        }
        out.push('\n');
    }

    out
}

fn detail_summary(entry: &CodeEntry) -> Option<String> {
    let fields: Vec<&str> = match entry.details() {
        Details::Habitat(h) => [&h.suitability, &h.season, &h.major_importance]
            .into_iter()
            .filter_map(|f| f.as_deref())
            .collect(),
        Details::Threat(t) => [&t.timing, &t.scope, &t.severity]
            .into_iter()
            .filter_map(|f| f.as_deref())
            .collect(),
        Details::ConservationMeasure | Details::Placeholder(_) => Vec::new(),
    };
    (!fields.is_empty()).then(|| fields.join(", "))
}
