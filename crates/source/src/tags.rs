use crate::document::Document;

/// Documents carrying `tag`, in input order.
pub fn documents_with_tag<'a>(documents: &'a [Document], tag: &str) -> Vec<&'a Document> {
    documents
        .iter()
        .filter(|doc| doc.metadata.has_tag(tag))
        .collect()
}

/// Every distinct tag, in order of first appearance.
pub fn all_tags(documents: &[Document]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in documents.iter().flat_map(|doc| &doc.metadata.tags) {
        if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::DocumentId;

    fn doc(slug: &str, tags: &str) -> Document {
        Document::from_source(
            DocumentId::new(slug),
            &format!("---\ntags: [{tags}]\n---\nbody"),
        )
    }

    #[test]
    fn filters_by_tag_and_collects_distinct_tags() {
        let docs = [
            doc("a", "rust, async"),
            doc("b", "typescript"),
            doc("c", "async"),
            doc("d", ""),
        ];
        let slugs: Vec<&str> = documents_with_tag(&docs, "async")
            .into_iter()
            .map(|d| d.id.slug.as_str())
            .collect();
        assert_eq!(slugs, ["a", "c"]);
        assert_eq!(all_tags(&docs), ["rust", "async", "typescript"]);
        assert!(documents_with_tag(&docs, "go").is_empty());
    }
}
