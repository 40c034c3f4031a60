//! Turning values into text for difference messages.

use crate::value::Value;

/// Formats values for human consumption. Only used to render messages, never
/// to decide whether two values are equal.
pub trait Representation: Send + Sync {
    fn to_string_of(&self, value: &Value) -> String;
}

/// The default representation.
///
/// Strings are quoted, containers are bracketed, objects print as
/// `Type {field=value, ...}`. Objects nested deeper than `max_depth`, or
/// reached again while being printed, are abbreviated so cyclic graphs
/// always render.
#[derive(Clone, Debug)]
pub struct StandardRepresentation {
    max_depth: usize,
    max_elements: usize,
}

impl Default for StandardRepresentation {
    fn default() -> Self {
        Self {
            max_depth: 4,
            max_elements: 1000,
        }
    }
}

impl StandardRepresentation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_elements(mut self, max_elements: usize) -> Self {
        self.max_elements = max_elements;
        self
    }

    fn write(&self, value: &Value, depth: usize, stack: &mut Vec<usize>, out: &mut String) {
        match value {
            Value::Null => out.push_str("null"),
            Value::Bool(b) => out.push_str(&b.to_string()),
            Value::Char(c) => {
                out.push('\'');
                out.push(*c);
                out.push('\'');
            }
            Value::Int(i) => out.push_str(&i.to_string()),
            Value::Float(f) => out.push_str(&format!("{f:?}")),
            Value::Str(s) => out.push_str(&format!("{:?}", &**s)),
            Value::Path(p) => out.push_str(&p.display().to_string()),
            Value::Json(j) => out.push_str(&j.to_string()),
            Value::Enum(e) => out.push_str(e.name()),
            Value::Array(items) => self.write_sequence(items, "[", "]", depth, stack, out),
            Value::Collection(c) => self.write_sequence(c.items(), "[", "]", depth, stack, out),
            Value::Map(m) => {
                out.push('{');
                for (i, (key, entry)) in m.entries().iter().enumerate() {
                    if i == self.max_elements {
                        out.push_str(", ...");
                        break;
                    }
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write(key, depth, stack, out);
                    out.push('=');
                    self.write(entry, depth, stack, out);
                }
                out.push('}');
            }
            Value::Optional(None) => out.push_str("Optional.empty"),
            Value::Optional(Some(inner)) => {
                out.push_str("Optional[");
                self.write(inner, depth, stack, out);
                out.push(']');
            }
            Value::AtomicIntArray(_) | Value::AtomicLongArray(_) | Value::AtomicRefArray(_) => {
                let elements = value.atomic_elements().unwrap_or_default();
                self.write_sequence(&elements, "[", "]", depth, stack, out);
            }
            Value::AtomicBool(_) | Value::AtomicInt(_) | Value::AtomicLong(_) | Value::AtomicRef(_) => {
                out.push_str(value.type_name().unwrap_or_default());
                out.push('[');
                if let Some(inner) = value.atomic_value() {
                    self.write(&inner, depth, stack, out);
                }
                out.push(']');
            }
            Value::Object(object) => {
                let identity = object.identity();
                if stack.contains(&identity) {
                    out.push_str(&format!("(cycle: {})", object.type_name()));
                    return;
                }
                if depth >= self.max_depth {
                    out.push_str(&format!("{} {{...}}", object.type_name()));
                    return;
                }
                stack.push(identity);
                out.push_str(object.type_name());
                out.push_str(" {");
                for (i, (name, field)) in object.fields().iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(name);
                    out.push('=');
                    self.write(field, depth + 1, stack, out);
                }
                out.push('}');
                stack.pop();
            }
        }
    }

    fn write_sequence(
        &self,
        items: &[Value],
        open: &str,
        close: &str,
        depth: usize,
        stack: &mut Vec<usize>,
        out: &mut String,
    ) {
        out.push_str(open);
        for (i, item) in items.iter().enumerate() {
            if i == self.max_elements {
                out.push_str(", ...");
                break;
            }
            if i > 0 {
                out.push_str(", ");
            }
            self.write(item, depth, stack, out);
        }
        out.push_str(close);
    }
}

impl Representation for StandardRepresentation {
    fn to_string_of(&self, value: &Value) -> String {
        let mut out = String::new();
        self.write(value, 0, &mut Vec::new(), &mut out);
        out
    }
}
