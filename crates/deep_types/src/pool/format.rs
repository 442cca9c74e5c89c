//! Type formatting for error messages and debugging.

use crate::{Idx, Pool, Tag};

impl Pool {
    /// Format a type as a human-readable, Go-style string.
    pub fn format_type(&self, idx: Idx) -> String {
        let mut buf = String::new();
        self.format_type_into(idx, &mut buf);
        buf
    }

    /// Format a type into an existing string buffer.
    pub fn format_type_into(&self, idx: Idx, buf: &mut String) {
        let tag = self.tag(idx);
        match tag {
            Tag::Reserved => buf.push_str(&idx.to_string()),

            Tag::Pointer => {
                buf.push('*');
                self.format_type_into(self.elem(idx), buf);
            }
            Tag::Slice => {
                buf.push_str("[]");
                self.format_type_into(self.elem(idx), buf);
            }
            Tag::Chan => {
                buf.push_str("chan ");
                self.format_type_into(self.elem(idx), buf);
            }
            Tag::Array => {
                buf.push('[');
                buf.push_str(&self.array_len(idx).to_string());
                buf.push(']');
                self.format_type_into(self.array_elem(idx), buf);
            }
            Tag::Map => {
                buf.push_str("map[");
                self.format_type_into(self.map_key(idx), buf);
                buf.push(']');
                self.format_type_into(self.map_value(idx), buf);
            }
            Tag::Func => {
                buf.push_str("func");
                self.format_list(&self.func_params(idx), buf);
                let results = self.func_results(idx);
                match results.as_slice() {
                    [] => {}
                    [single] => {
                        buf.push(' ');
                        self.format_type_into(*single, buf);
                    }
                    many => {
                        buf.push(' ');
                        self.format_list(many, buf);
                    }
                }
            }
            Tag::Struct => match self.struct_def(idx) {
                Some(def) => buf.push_str(&def.name),
                None => buf.push_str("struct"),
            },
            Tag::Interface => buf.push_str(self.interface_name(idx).unwrap_or("interface")),

            // Primitives
            _ => buf.push_str(tag.name()),
        }
    }

    fn format_list(&self, items: &[Idx], buf: &mut String) {
        buf.push('(');
        for (i, &item) in items.iter().enumerate() {
            if i > 0 {
                buf.push_str(", ");
            }
            self.format_type_into(item, buf);
        }
        buf.push(')');
    }
}
