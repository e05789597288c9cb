use lazy_static::lazy_static;
use log::error;
use serde::Serialize;
use tera::{Context, Tera};

use crate::profile::ConfigRecord;

lazy_static! {
    pub static ref TEMPLATES: Tera = {
        let mut tera = Tera::default();
        if let Err(e) = tera.add_raw_template("index.html", include_str!("../templates/index.html")) {
            error!("Template parsing error: {}", e);
            std::process::exit(1);
        }
        // values are escaped with escape_html before they reach the template
        tera.autoescape_on(vec![]);
        tera
    };
}

/// Escapes `"`, `'`, `<` and `>` for use inside an HTML attribute value.
/// Everything else, `&` included, is left alone.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Banner shown above the profile list after a submission.
#[derive(Debug, Clone)]
pub enum Notice {
    Success(String),
    Error(String),
}

#[derive(Serialize)]
struct ProfileView {
    profile: String,
    ssid: String,
    password: String,
}

impl From<&ConfigRecord> for ProfileView {
    fn from(record: &ConfigRecord) -> Self {
        ProfileView {
            profile: escape_html(record.profile_name()),
            ssid: escape_html(record.ssid()),
            password: escape_html(record.passphrase()),
        }
    }
}

/// Renders the listing page with one edit form per profile.
pub fn render_index(profiles: &[ConfigRecord], notice: Option<&Notice>) -> tera::Result<String> {
    let views: Vec<ProfileView> = profiles.iter().map(ProfileView::from).collect();

    let mut context = Context::new();
    context.insert("profiles", &views);
    match notice {
        Some(Notice::Success(msg)) => {
            context.insert("notice", &escape_html(msg));
            context.insert("notice_kind", "success");
        }
        Some(Notice::Error(msg)) => {
            context.insert("notice", &escape_html(msg));
            context.insert("notice_kind", "error");
        }
        None => {
            context.insert("notice", "");
            context.insert("notice_kind", "");
        }
    }

    TEMPLATES.render("index.html", &context)
}
