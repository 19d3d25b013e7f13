/// Joins location names into an English "or" list.
///
/// | Input           | Output         |
/// |-----------------|----------------|
/// | `[]`            | `""`           |
/// | `[A]`           | `"A"`          |
/// | `[A, B]`        | `"A or B"`     |
/// | `[A, B, C]`     | `"A, B, or C"` |
pub fn format_location_list<S: AsRef<str>>(names: &[S]) -> String {
    match names {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [first, second] => format!("{} or {}", first.as_ref(), second.as_ref()),
        [all_but_last @ .., last] => {
            let head: Vec<&str> = all_but_last.iter().map(|s| s.as_ref()).collect();
            format!("{}, or {}", head.join(", "), last.as_ref())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_location_list() {
        let empty: [&str; 0] = [];
        assert_eq!(format_location_list(&empty), "");
        assert_eq!(format_location_list(&["A"]), "A");
        assert_eq!(format_location_list(&["A", "B"]), "A or B");
        assert_eq!(format_location_list(&["A", "B", "C"]), "A, B, or C");
        assert_eq!(format_location_list(&["A", "B", "C", "D"]), "A, B, C, or D");
    }

    #[test]
    fn test_accepts_owned_strings() {
        let names = vec!["Floor 1".to_string(), "Floor 4".to_string()];
        assert_eq!(format_location_list(&names), "Floor 1 or Floor 4");
    }
}
