//! Message templates with named holes
//!
//! `"User {UserId} created {Address}"` rendered with `[42, "x@tmp.io"]` becomes
//! `"User 42 created x@tmp.io"`, and the named holes are captured as properties
//! (`UserId=42`, `Address=x@tmp.io`). Holes are filled in order of appearance; purely
//! numeric holes (`{0}`) index the argument list and are not captured. `{{` and `}}`
//! produce literal braces. Holes without an argument are left as written.

use super::properties::{FieldValue, Properties};

/// Rendered message plus the properties captured from named holes
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMessage {
    pub message: String,
    pub properties: Properties,
}

pub fn render(template: &str, args: &[FieldValue]) -> RenderedMessage {
    let mut message = String::with_capacity(template.len());
    let mut properties = Properties::new();
    let mut next_arg = 0;
    let mut chars = template.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        match c {
            '{' if matches!(chars.peek(), Some((_, '{'))) => {
                chars.next();
                message.push('{');
            }
            '}' if matches!(chars.peek(), Some((_, '}'))) => {
                chars.next();
                message.push('}');
            }
            '{' => {
                let Some(end) = template[start + 1..].find('}') else {
                    message.push_str(&template[start..]);
                    break;
                };
                let hole = &template[start + 1..start + 1 + end];
                // skip the hole body and the closing brace
                for _ in 0..hole.chars().count() + 1 {
                    chars.next();
                }

                // `{Name:format}` keeps only the name
                let name = hole.split(':').next().unwrap_or(hole).trim();
                let value = match name.parse::<usize>() {
                    Ok(index) => args.get(index),
                    Err(_) => {
                        let value = args.get(next_arg);
                        next_arg += 1;
                        if let Some(value) = value {
                            properties.insert(name.to_string(), value.clone());
                        }
                        value
                    }
                };

                match value {
                    Some(value) => message.push_str(&value.to_string()),
                    None => {
                        message.push('{');
                        message.push_str(hole);
                        message.push('}');
                    }
                }
            }
            _ => message.push(c),
        }
    }

    RenderedMessage {
        message,
        properties,
    }
}
