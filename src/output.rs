use crate::fields::{self, FieldSpec};
use crate::form::{Form, Widget};
use crate::presentation::{Tone, View};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum, Serialize, Deserialize)]
pub enum OutputFormat {
    Plain,
    Json,
}

/// Print the result region in the specified format
pub fn print_view(view: &View, format: OutputFormat) {
    match format {
        OutputFormat::Plain => print!("{}", format_plain(view)),
        OutputFormat::Json => print_json(view),
    }
}

/// Render a view as plain text
pub fn format_plain(view: &View) -> String {
    let mut out = String::new();

    if view.loading {
        out.push_str("Predicting...\n");
        return out;
    }
    if view.placeholder_visible {
        out.push_str("Fill in the form and submit to see a prediction.\n");
    }
    if !view.result_visible {
        return out;
    }

    let heading = view.heading.as_deref().unwrap_or_default();
    match view.tone {
        Some(Tone::Error) => out.push_str(&format!("✖ {}\n", heading)),
        Some(Tone::Positive) => out.push_str(&format!("Predicted income: {} (positive)\n", heading)),
        Some(Tone::Negative) | None => {
            out.push_str(&format!("Predicted income: {} (negative)\n", heading))
        }
    }
    if let Some(message) = &view.message {
        out.push_str(&format!("  {}\n", message));
    }
    out
}

fn print_json(view: &View) {
    match serde_json::to_string_pretty(view) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing result to JSON: {}", e),
    }
}

/// Current values of every widget, one per line
pub fn format_form(form: &Form) -> String {
    let mut out = String::new();
    for widget in form.widgets() {
        let line = match widget {
            Widget::Number(input) => format!(
                "{:<16} {:<22} {}\n",
                input.field().name,
                input.field().label,
                input.value()
            ),
            Widget::Choice(dropdown) => format!(
                "{:<16} {:<22} {}{}\n",
                dropdown.field().name,
                dropdown.field().label,
                dropdown.selected(),
                if dropdown.is_open() { "  [open]" } else { "" }
            ),
        };
        out.push_str(&line);
    }
    out
}

/// Catalogue of all fields with their options or stepper increment
pub fn format_fields() -> String {
    let mut out = String::new();
    for spec in fields::WIRE_ORDER {
        match spec {
            FieldSpec::Numeric(field) => out.push_str(&format!(
                "{} ({}): integer >= 0, step {}\n",
                field.name, field.label, field.step
            )),
            FieldSpec::Categorical(field) => {
                out.push_str(&format!("{} ({}):\n", field.name, field.label));
                for option in field.options {
                    out.push_str(&format!("  - {}\n", option));
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PredictionResponse;
    use crate::presentation::{PresentationState, render};

    #[test]
    fn test_plain_success() {
        let view = render(&PresentationState::Success(PredictionResponse {
            prediction: ">50K".to_string(),
            prediction_label: 1,
        }));
        assert_eq!(format_plain(&view), "Predicted income: >50K (positive)\n");
    }

    #[test]
    fn test_plain_error_has_single_message_line() {
        let view = render(&PresentationState::Error("Invalid token".to_string()));
        let text = format_plain(&view);
        assert_eq!(text, "✖ Error\n  Invalid token\n");
    }

    #[test]
    fn test_plain_loading_and_initial() {
        assert_eq!(format_plain(&render(&PresentationState::Loading)), "Predicting...\n");
        assert!(format_plain(&render(&PresentationState::Initial)).contains("submit"));
    }

    #[test]
    fn test_json_view() {
        let view = render(&PresentationState::Error("boom".to_string()));
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["tone"], "error");
        assert_eq!(json["message"], "boom");
        assert_eq!(json["heading"], "Error");
    }

    #[test]
    fn test_format_form_shows_open_dropdown() {
        let mut form = Form::new();
        form.set("age", "52").unwrap();
        if let Widget::Choice(dropdown) = form.widget_mut("gender").unwrap() {
            dropdown.toggle();
        }
        let text = format_form(&form);
        assert!(text.lines().any(|line| line.starts_with("age") && line.ends_with("52")));
        assert!(text.contains("Male  [open]"));
    }

    #[test]
    fn test_format_fields_lists_options() {
        let text = format_fields();
        assert!(text.contains("fnlwgt (Final Weight): integer >= 0, step 1000"));
        assert!(text.contains("  - Holland-Netherlands\n"));
    }
}
