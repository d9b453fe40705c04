use super::{App, AppAction, AppCommand};
use crate::core::app::{ModelPicker, UiMode};
use crate::core::dispatch::MISSING_API_KEY_MESSAGE;

pub(super) fn handle_picker_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::OpenModelPicker => return open_model_picker(app),
        AppAction::PickerMove { delta } => {
            if let UiMode::ModelPicker(picker) = &mut app.mode {
                picker.move_selection(delta);
            }
        }
        AppAction::PickerSelect => select_model(app),
        AppAction::ModelsLoaded { models } => {
            if !matches!(app.mode, UiMode::ModelPicker(ModelPicker::Loading)) {
                // Picker was dismissed while loading.
                return None;
            }
            if models.is_empty() {
                app.show_notice("Models", "No GPT models are available for this API key.");
            } else {
                let current = app.config.snapshot().current_model.clone();
                app.mode = UiMode::ModelPicker(ModelPicker::ready(models, &current));
            }
        }
        AppAction::ModelsLoadFailed { error } => {
            if matches!(app.mode, UiMode::ModelPicker(_)) {
                app.show_notice("Error", format!("Failed to list models: {error}"));
            }
        }
        _ => {}
    }
    None
}

fn open_model_picker(app: &mut App) -> Option<AppCommand> {
    let snapshot = app.config.snapshot();
    let Some(api_key) = snapshot.api_key() else {
        app.show_notice("Error", MISSING_API_KEY_MESSAGE);
        return None;
    };
    app.mode = UiMode::ModelPicker(ModelPicker::Loading);
    Some(AppCommand::LoadModels {
        api_key: api_key.to_string(),
    })
}

fn select_model(app: &mut App) {
    let UiMode::ModelPicker(picker) = std::mem::replace(&mut app.mode, UiMode::Terminal) else {
        return;
    };
    let Some(model) = picker.selected_model() else {
        return;
    };

    let snapshot = app.config.set_model(model);
    app.publish_config(snapshot);
    tracing::info!(model, "selected model");
    if app.config.load_failed() {
        app.set_status(format!(
            "Selected model: {model} (this run only; configuration file failed to load)"
        ));
    } else {
        app.set_status(format!("Selected model: {model}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::app::actions::{apply_action, AppActionContext};
    use crate::core::config::{Config, ConfigStore};
    use crate::utils::test_utils::{config_with_key, create_test_app};

    fn act(app: &mut App, action: AppAction) -> Option<AppCommand> {
        apply_action(app, action, AppActionContext::default())
    }

    fn models(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn missing_key_blocks_with_notice() {
        let mut app = create_test_app(Config::default());
        assert!(act(&mut app, AppAction::OpenModelPicker).is_none());
        let UiMode::Notice(notice) = &app.mode else {
            panic!("expected a notice");
        };
        assert_eq!(notice.message, MISSING_API_KEY_MESSAGE);
    }

    #[test]
    fn opening_requests_model_load() {
        let mut app = create_test_app(config_with_key());
        let command = act(&mut app, AppAction::OpenModelPicker);
        assert!(matches!(
            command,
            Some(AppCommand::LoadModels { ref api_key }) if api_key == "sk-test"
        ));
        assert!(matches!(app.mode, UiMode::ModelPicker(ModelPicker::Loading)));
    }

    #[test]
    fn selecting_updates_every_session_and_marks_dirty() {
        let mut app = create_test_app(config_with_key());
        act(&mut app, AppAction::NewTab);
        act(&mut app, AppAction::OpenModelPicker);
        act(
            &mut app,
            AppAction::ModelsLoaded {
                models: models(&["gpt-4o", "gpt-3.5-turbo"]),
            },
        );
        act(&mut app, AppAction::PickerMove { delta: -1 });
        act(&mut app, AppAction::PickerSelect);

        assert!(app.config.is_dirty());
        assert!(app
            .sessions
            .iter()
            .all(|session| session.config().current_model == "gpt-4o"));
        assert_eq!(app.status.as_deref(), Some("Selected model: gpt-4o"));
    }

    #[test]
    fn selection_over_broken_config_is_flagged_as_this_run_only() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("chatlpt_config.json");
        std::fs::write(&path, "{ not json").unwrap();
        let (store, err) = ConfigStore::load(path, None);
        assert!(err.is_some());
        let mut app = App::new(store);
        app.mode = UiMode::ModelPicker(ModelPicker::ready(models(&["gpt-4o"]), "gpt-4o"));

        act(&mut app, AppAction::PickerSelect);
        assert_eq!(
            app.status.as_deref(),
            Some("Selected model: gpt-4o (this run only; configuration file failed to load)")
        );
        assert!(app.config.persist().is_err());
    }

    #[test]
    fn late_model_list_after_dismiss_is_ignored() {
        let mut app = create_test_app(config_with_key());
        act(&mut app, AppAction::OpenModelPicker);
        act(&mut app, AppAction::DismissOverlay);
        act(
            &mut app,
            AppAction::ModelsLoaded {
                models: models(&["gpt-4o"]),
            },
        );
        assert!(matches!(app.mode, UiMode::Terminal));
    }

    #[test]
    fn load_failure_becomes_notice() {
        let mut app = create_test_app(config_with_key());
        act(&mut app, AppAction::OpenModelPicker);
        act(
            &mut app,
            AppAction::ModelsLoadFailed {
                error: "boom".to_string(),
            },
        );
        let UiMode::Notice(notice) = &app.mode else {
            panic!("expected a notice");
        };
        assert_eq!(notice.message, "Failed to list models: boom");
    }
}
