use chrono::Utc;
use contracts::domain::a001_form::aggregate::Field;
use contracts::domain::a003_template::aggregate::{Template, TemplateId};
use serde_json::{Map, Value};

use super::repository;

/// All templates, seeding the defaults on an empty table so a fresh
/// install has something to show in the builder.
pub async fn list_all_seeded() -> anyhow::Result<Vec<Template>> {
    let templates = repository::list_all().await?;
    if !templates.is_empty() {
        return Ok(templates);
    }

    tracing::info!("No templates found, seeding defaults");
    for template in default_templates() {
        repository::insert(&template).await?;
    }
    repository::list_all().await
}

fn field(label: &str, field_type: &str, required: bool) -> Field {
    Field {
        label: label.to_string(),
        field_type: field_type.to_string(),
        required,
        id: None,
        options: None,
    }
}

fn choice_field(label: &str, field_type: &str, required: bool, options: &[&str]) -> Field {
    Field {
        options: Some(options.iter().map(|o| o.to_string()).collect()),
        ..field(label, field_type, required)
    }
}

fn settings(theme_color: &str, confirmation: &str) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("themeColor".into(), Value::String(theme_color.into()));
    map.insert("confirmationMessage".into(), Value::String(confirmation.into()));
    map
}

fn template(
    name: &str,
    description: &str,
    fields: Vec<Field>,
    settings: Map<String, Value>,
) -> Template {
    let now = Utc::now();
    Template {
        id: TemplateId::new_v4(),
        name: name.to_string(),
        description: description.to_string(),
        fields,
        settings,
        created_at: now,
        updated_at: now,
    }
}

fn default_templates() -> Vec<Template> {
    vec![
        template(
            "Contact Form",
            "A simple contact form template",
            vec![
                field("Name", "text", true),
                field("Email", "email", true),
                field("Message", "textarea", true),
            ],
            settings("#2e86de", "Thank you for contacting us!"),
        ),
        template(
            "Event Registration",
            "Register participants for an event",
            vec![
                field("Full Name", "text", true),
                field("Email", "email", true),
                field("Telephone Number", "telephone", false),
                field("Event Date", "date", true),
                field("Number of Tickets", "number", true),
            ],
            settings("#e67e22", "Thank you for registering!"),
        ),
        template(
            "Job Application",
            "Collect job applications with resume upload",
            vec![
                field("Full Name", "text", true),
                field("Email", "email", true),
                field("Phone", "text", false),
                field("Resume", "file", true),
                field("Cover Letter", "textarea", false),
            ],
            settings("#8e44ad", "Your application has been submitted!"),
        ),
        template(
            "Survey",
            "A general survey template with multiple choice",
            vec![
                field("Age", "number", false),
                choice_field("Gender", "select", false, &["Male", "Female", "Other"]),
                field("How did you hear about us?", "text", false),
                choice_field("Would you recommend us?", "radio", true, &["Yes", "No"]),
            ],
            settings("#16a085", "Thank you for completing the survey!"),
        ),
        template(
            "Appointment Booking",
            "Book appointments with date and time selection",
            vec![
                field("Full Name", "text", true),
                field("Email", "email", true),
                field("Preferred Date", "date", true),
                field("Preferred Time", "time", true),
                field("Notes", "textarea", false),
            ],
            settings("#2980b9", "Your appointment is booked!"),
        ),
    ]
}
