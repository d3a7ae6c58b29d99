//! The key-set document ships bare base64 DER bodies; the verifier wants PEM.

const BEGIN: &str = "-----BEGIN CERTIFICATE-----";
const END: &str = "-----END CERTIFICATE-----";
const LINE_WIDTH: usize = 64;

/// Wrap a bare certificate body in PEM armor, folded at 64 columns.
pub fn to_pem(body: &str) -> String {
    let compact: String = body.chars().filter(|c| !c.is_whitespace()).collect();

    let mut pem = String::with_capacity(compact.len() + compact.len() / LINE_WIDTH + 64);
    pem.push_str(BEGIN);
    pem.push('\n');
    for line in compact.as_bytes().chunks(LINE_WIDTH) {
        // base64 is ASCII, so byte chunks stay on char boundaries
        pem.push_str(&String::from_utf8_lossy(line));
        pem.push('\n');
    }
    pem.push_str(END);
    pem.push('\n');
    pem
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_body_in_armor() {
        let pem = to_pem("MIIBszCCAVmgAwIBAgIU");
        assert_eq!(
            pem,
            "-----BEGIN CERTIFICATE-----\nMIIBszCCAVmgAwIBAgIU\n-----END CERTIFICATE-----\n"
        );
    }

    #[test]
    fn folds_long_bodies() {
        let body = "A".repeat(150);
        let pem = to_pem(&body);
        let lines: Vec<&str> = pem.lines().collect();
        assert_eq!(lines.first(), Some(&BEGIN));
        assert_eq!(lines.last(), Some(&END));
        assert_eq!(lines[1].len(), 64);
        assert_eq!(lines[2].len(), 64);
        assert_eq!(lines[3].len(), 22);
    }

    #[test]
    fn strips_embedded_whitespace() {
        assert_eq!(to_pem("AB\nCD "), to_pem("ABCD"));
    }
}
