//! Filename sanitization for names that arrive from clients.

/// Sanitizes a client-supplied filename before it is joined onto a directory.
///
/// - Removes `\ / * ? : " < > |` and control characters
/// - Trims surrounding whitespace
/// - Limits length to 255 bytes (NAME_MAX)
pub fn sanitize_filename(name: &str) -> String {
    const NAME_MAX: usize = 255;
    const RESERVED: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

    let cleaned: String = name
        .chars()
        .filter(|c| !RESERVED.contains(c) && !c.is_control())
        .collect();
    let trimmed = cleaned.trim();

    if trimmed.len() > NAME_MAX {
        let mut take = NAME_MAX;
        while take > 0 && !trimmed.is_char_boundary(take) {
            take -= 1;
        }
        trimmed[..take].to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_path_separators() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "....etcpasswd");
        assert_eq!(sanitize_filename("a\\b.mp3"), "ab.mp3");
    }

    #[test]
    fn removes_reserved_characters() {
        assert_eq!(
            sanitize_filename("What? \"Live\" <2024>: a|b*.mp4"),
            "What Live 2024 ab.mp4"
        );
    }

    #[test]
    fn trims_whitespace_and_controls() {
        assert_eq!(sanitize_filename("  song\x00.mp3 \n"), "song.mp3");
    }

    #[test]
    fn limits_length() {
        let long = "é".repeat(200);
        let out = sanitize_filename(&long);
        assert!(out.len() <= 255);
        assert!(out.chars().all(|c| c == 'é'));
    }
}
