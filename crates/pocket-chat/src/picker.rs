use pocket_chat_model::ModelCatalog;

/// Resolves what the user typed at the model prompt.
///
/// An empty answer picks the default model. Otherwise the answer is either
/// a 1-based position in the catalog or a model identifier.
pub fn pick_model<'a>(
    catalog: &'a ModelCatalog,
    answer: &str,
) -> Option<&'a str> {
    let answer = answer.trim();
    if answer.is_empty() {
        return catalog.default_model();
    }
    if let Ok(position) = answer.parse::<usize>() {
        return position.checked_sub(1).and_then(|idx| catalog.get(idx));
    }
    catalog.select(answer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_model() {
        let catalog = ModelCatalog::default();
        assert_eq!(pick_model(&catalog, "\n"), Some("gpt2"));
        assert_eq!(pick_model(&catalog, "2"), Some("bert-base-uncased"));
        assert_eq!(
            pick_model(&catalog, "roberta-base\n"),
            Some("roberta-base")
        );
        assert_eq!(pick_model(&catalog, "0"), None);
        assert_eq!(pick_model(&catalog, "6"), None);
        assert_eq!(pick_model(&catalog, "llama"), None);
    }
}
