//! Text templates for segment output.
//!
//! Segment templates use the Go `text/template` field syntax the status-line
//! configs are written in: `{{.Sgv}}`, `{{ .Sgv }}`, with `{{-` and `-}}`
//! trimming the whitespace next to the action. Only field lookups are
//! supported; there are no pipelines, conditionals or functions.

/// Named fields a template can refer to.
pub trait TemplateContext {
    /// The rendered value of field `name`, or `None` if there is no such field.
    fn field(&self, name: &str) -> Option<String>;
}

/// Template rendering failures. The message is shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    /// `{{` without a matching `}}`
    #[error("template: unclosed action at offset {offset}")]
    Unclosed { offset: usize },

    /// Anything other than a `.Field` lookup
    #[error("template: unsupported action {0:?}")]
    UnsupportedAction(String),

    /// `.Field` names a field the context does not have
    #[error("template: can't evaluate field {0}")]
    UnknownField(String),
}

/// Renders a template string against a context.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, template: &str, ctx: &dyn TemplateContext) -> Result<String, TemplateError>;
}

/// The built-in field-substitution renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextTemplate;

impl TextTemplate {
    pub fn new() -> Self {
        Self
    }
}

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

impl TemplateRenderer for TextTemplate {
    fn render(&self, template: &str, ctx: &dyn TemplateContext) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        let mut offset = 0;

        while let Some(start) = rest.find(OPEN) {
            // Trim markers only reach template text, never earlier action output.
            let text_start = out.len();
            out.push_str(&rest[..start]);

            let after_open = &rest[start + OPEN.len()..];
            let end = after_open.find(CLOSE).ok_or(TemplateError::Unclosed {
                offset: offset + start,
            })?;

            let mut action = &after_open[..end];

            // `{{- ` and ` -}}` need the space, as in Go, so `{{-3}}` is not a trim.
            if let Some(inner) = action.strip_prefix('-')
                && inner.starts_with(char::is_whitespace)
            {
                let kept = out[text_start..].trim_end().len();
                out.truncate(text_start + kept);
                action = inner;
            }

            let trim_right = match action.strip_suffix('-') {
                Some(inner) if inner.ends_with(char::is_whitespace) => {
                    action = inner;
                    true
                }
                _ => false,
            };

            out.push_str(&eval_action(action.trim(), ctx)?);

            let consumed = start + OPEN.len() + end + CLOSE.len();
            rest = &rest[consumed..];
            offset += consumed;

            if trim_right {
                let trimmed = rest.trim_start();
                offset += rest.len() - trimmed.len();
                rest = trimmed;
            }
        }

        out.push_str(rest);
        Ok(out)
    }
}

fn eval_action(action: &str, ctx: &dyn TemplateContext) -> Result<String, TemplateError> {
    let name = action
        .strip_prefix('.')
        .filter(|name| {
            !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_')
        })
        .ok_or_else(|| TemplateError::UnsupportedAction(action.to_string()))?;

    ctx.field(name)
        .ok_or_else(|| TemplateError::UnknownField(name.to_string()))
}
