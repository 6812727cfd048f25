//! Sort resolver.

use std::str::FromStr;

/// A closed set of sortable fields for one record kind.
///
/// Parsing is case-insensitive; the `Default` variant is the identifier and
/// is used whenever the requested name is absent or unknown.
pub trait SortKey: FromStr + Default + Copy {
    /// Column the key orders by
    fn column(self) -> &'static str;

    /// Text columns compare without regard to case
    fn is_text(self) -> bool;
}

/// A resolved `ORDER BY` clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ordering {
    pub column: &'static str,
    pub text: bool,
    pub descending: bool,
}

impl Ordering {
    /// Render as SQL. Non-identifier keys get `id ASC` as a secondary key so
    /// equal sort values still page deterministically.
    pub fn to_sql(&self) -> String {
        let direction = if self.descending { "DESC" } else { "ASC" };

        if self.column == "id" {
            format!("id {}", direction)
        } else if self.text {
            format!("fold_case({}) {}, id ASC", self.column, direction)
        } else {
            format!("{} {}, id ASC", self.column, direction)
        }
    }
}

/// Resolve a requested sort name against `K`
pub fn resolve<K: SortKey>(sort_by: Option<&str>, descending: bool) -> Ordering {
    let key = sort_by
        .map(str::trim)
        .and_then(|name| K::from_str(name).ok())
        .unwrap_or_default();

    Ordering {
        column: key.column(),
        text: key.is_text(),
        descending,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::EnumString;

    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString)]
    #[strum(ascii_case_insensitive)]
    enum Key {
        #[default]
        Id,
        Name,
        Joined,
    }

    impl SortKey for Key {
        fn column(self) -> &'static str {
            match self {
                Key::Id => "id",
                Key::Name => "name",
                Key::Joined => "joined",
            }
        }

        fn is_text(self) -> bool {
            matches!(self, Key::Name)
        }
    }

    #[test]
    fn test_names_resolve_case_insensitively() {
        assert_eq!(resolve::<Key>(Some("NAME"), false).column, "name");
        assert_eq!(resolve::<Key>(Some(" joined "), false).column, "joined");
    }

    #[test]
    fn test_unknown_and_absent_fall_back_to_id() {
        let expected = Ordering {
            column: "id",
            text: false,
            descending: true,
        };
        assert_eq!(resolve::<Key>(Some("shoeSize"), true), expected);
        assert_eq!(resolve::<Key>(None, true), expected);
        assert_eq!(resolve::<Key>(Some(""), true), expected);
    }

    #[test]
    fn test_order_by_sql() {
        assert_eq!(resolve::<Key>(None, false).to_sql(), "id ASC");
        assert_eq!(
            resolve::<Key>(Some("name"), true).to_sql(),
            "fold_case(name) DESC, id ASC"
        );
        assert_eq!(
            resolve::<Key>(Some("joined"), false).to_sql(),
            "joined ASC, id ASC"
        );
    }
}
