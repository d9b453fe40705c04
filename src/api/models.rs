use crate::api::ModelInfo;

/// Keep chat-capable GPT models and return their ids, newest first.
pub fn chat_model_ids(mut models: Vec<ModelInfo>) -> Vec<String> {
    models.retain(|model| model.id.to_lowercase().contains("gpt"));
    sort_models(&mut models);
    models.into_iter().map(|model| model.id).collect()
}

pub fn sort_models(models: &mut [ModelInfo]) {
    // Newest first; entries without a creation date go last, ordered by id.
    models.sort_by(|a, b| match (a.created, b.created) {
        (Some(a_created), Some(b_created)) => {
            b_created.cmp(&a_created).then_with(|| a.id.cmp(&b.id))
        }
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.id.cmp(&b.id),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(id: &str, created: Option<u64>) -> ModelInfo {
        ModelInfo {
            id: id.to_string(),
            created,
        }
    }

    #[test]
    fn filters_non_gpt_models_case_insensitively() {
        let ids = chat_model_ids(vec![
            model("whisper-1", Some(5)),
            model("GPT-4o", Some(3)),
            model("dall-e-3", Some(4)),
            model("ft:gpt-3.5-turbo:acme", Some(1)),
        ]);
        assert_eq!(ids, vec!["GPT-4o", "ft:gpt-3.5-turbo:acme"]);
    }

    #[test]
    fn undated_models_sort_after_dated_ones() {
        let ids = chat_model_ids(vec![
            model("gpt-b", None),
            model("gpt-old", Some(1)),
            model("gpt-a", None),
            model("gpt-new", Some(9)),
        ]);
        assert_eq!(ids, vec!["gpt-new", "gpt-old", "gpt-a", "gpt-b"]);
    }
}
