/// Pure functions for building the birthday list pages (Discord-agnostic)
use super::datetime::get_month_name;
use super::pagination::paginate;
use super::string_utils::escape_markdown;

/// Text shown above every page of the birthday list
pub const BIRTHDAY_LIST_HEADER: &str = "Use `/birthdayset` to add your birthday!";

/// One birthday in the list, with the member's name if they are still in the guild
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedBirthday {
    pub month: u32,
    pub day: u32,
    pub member_name: Option<String>,
}

/// Rendered content of one page of the birthday list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthdayPage {
    pub description: String,
    pub footer: String,
    /// Number of entries on this page whose member is still in the guild
    pub visible: usize,
}

/// Format a single list line, e.g. `**March 15**: alice`
pub fn format_birthday_line(month: u32, day: u32, name: &str) -> String {
    format!("**{} {}**: {}", get_month_name(month), day, escape_markdown(name))
}

/// Build the pages for an already sorted birthday list
///
/// Pages partition the whole list; entries for members that left the guild
/// still count towards their page but are not rendered.
pub fn build_birthday_pages(entries: &[ListedBirthday], page_size: usize) -> Vec<BirthdayPage> {
    let chunks = paginate(entries, page_size);
    let page_count = chunks.len();

    chunks
        .iter()
        .enumerate()
        .map(|(index, chunk)| {
            let lines: Vec<String> = chunk
                .iter()
                .filter_map(|entry| {
                    entry
                        .member_name
                        .as_deref()
                        .map(|name| format_birthday_line(entry.month, entry.day, name))
                })
                .collect();

            let mut description = format!("{}\n\n", BIRTHDAY_LIST_HEADER);
            for line in &lines {
                description.push_str(line);
                description.push_str("\n\n");
            }

            BirthdayPage {
                description,
                footer: format!(
                    "🎉 Page {}/{} • Showing {} birthdays • Total: {}",
                    index + 1,
                    page_count,
                    chunk.len(),
                    entries.len()
                ),
                visible: lines.len(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(month: u32, day: u32, name: Option<&str>) -> ListedBirthday {
        ListedBirthday {
            month,
            day,
            member_name: name.map(str::to_string),
        }
    }

    #[test]
    fn test_format_birthday_line_escapes_names() {
        assert_eq!(format_birthday_line(3, 15, "alice"), "**March 15**: alice");
        assert_eq!(format_birthday_line(12, 1, "_bob_"), "**December 1**: \\_bob\\_");
    }

    #[test]
    fn test_build_birthday_pages_single_page() {
        let entries = vec![entry(1, 2, Some("alice")), entry(5, 9, Some("bob"))];
        let pages = build_birthday_pages(&entries, 30);

        assert_eq!(pages.len(), 1);
        assert!(pages[0].description.starts_with(BIRTHDAY_LIST_HEADER));
        assert!(pages[0].description.contains("**January 2**: alice"));
        assert!(pages[0].description.contains("**May 9**: bob"));
        assert_eq!(pages[0].visible, 2);
        assert_eq!(
            pages[0].footer,
            "🎉 Page 1/1 • Showing 2 birthdays • Total: 2"
        );
    }

    #[test]
    fn test_build_birthday_pages_hides_departed_members() {
        let entries = vec![entry(1, 2, Some("alice")), entry(2, 3, None)];
        let pages = build_birthday_pages(&entries, 30);

        assert_eq!(pages[0].visible, 1);
        assert!(!pages[0].description.contains("February"));
    }

    #[test]
    fn test_build_birthday_pages_partitions_list() {
        let entries: Vec<ListedBirthday> = (1..=12)
            .flat_map(|m| (1..=6).map(move |d| entry(m, d, Some("member"))))
            .collect();
        let pages = build_birthday_pages(&entries, 30);

        assert_eq!(pages.len(), 3);
        assert_eq!(pages.iter().map(|p| p.visible).sum::<usize>(), 72);
        assert!(pages[2].footer.starts_with("🎉 Page 3/3 • Showing 12 birthdays"));
        assert!(pages[0].description.contains("**January 1**"));
        assert!(!pages[1].description.contains("**January 1**"));
    }

    #[test]
    fn test_build_birthday_pages_empty() {
        assert!(build_birthday_pages(&[], 30).is_empty());
    }
}
