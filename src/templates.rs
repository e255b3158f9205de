use std::sync::Arc;

use tera::{Context, Tera};

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("home.html", include_str!("../templates/home.html")),
    ("register.html", include_str!("../templates/register.html")),
    ("login.html", include_str!("../templates/login.html")),
    ("users.html", include_str!("../templates/users.html")),
    ("swagger.html", include_str!("../templates/swagger.html")),
];

/// HTML pages compiled into the binary.
#[derive(Clone)]
pub struct Templates {
    tera: Arc<Tera>,
    app_name: Arc<str>,
}

impl Templates {
    pub fn new(app_name: &str) -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.iter().copied())?;
        tera.autoescape_on(vec![".html"]);
        Ok(Self {
            tera: Arc::new(tera),
            app_name: app_name.into(),
        })
    }

    /// Render `template`; `app_name` is always available to the page.
    pub fn render(&self, template: &str, context: &Context) -> Result<String, tera::Error> {
        let mut ctx = context.clone();
        ctx.insert("app_name", &*self.app_name);
        self.tera.render(template, &ctx)
    }

    pub fn render_simple(&self, template: &str) -> Result<String, tera::Error> {
        self.render(template, &Context::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_page_renders_with_minimal_context() {
        let t = Templates::new("Roster").expect("templates compile");
        let mut ctx = Context::new();
        ctx.insert("users", &Vec::<String>::new());
        for page in ["home.html", "register.html", "login.html", "users.html"] {
            let html = t.render(page, &ctx).expect(page);
            assert!(html.contains("Roster"), "{page} shows app name");
        }
    }

    #[test]
    fn user_values_are_escaped() {
        let t = Templates::new("Roster").unwrap();
        let mut ctx = Context::new();
        ctx.insert("error", "<script>alert(1)</script>");
        let html = t.render("login.html", &ctx).unwrap();
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
