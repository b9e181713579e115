//! Pages returned to the ACS-driven iframes.
//!
//! Both pages hand their result to the merchant page that embeds them via
//! `window.parent.postMessage`, restricted to the merchant's own origin.
//! Values travel in `data-` attributes and are HTML-escaped.

use threeds::ChallengeResult;

/// Page served after the 3DS Method: tells the parent that fingerprinting
/// finished for `transaction_id` so it can call `/authenticate`.
pub fn render_method_notification(transaction_id: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>3DS Method</title></head>
<body data-trans-id="{id}">
<script>
  window.parent.postMessage(
    {{ methodCompleted: true, threeDSServerTransID: document.body.dataset.transId }},
    window.location.origin
  );
</script>
</body>
</html>
"#,
        id = escape_html(transaction_id)
    )
}

/// Page served after the challenge: tells the parent the final verdict.
pub fn render_challenge_result(result: ChallengeResult) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>3DS Challenge</title></head>
<body data-status="{status}">
<script>
  window.parent.postMessage(
    {{ challengeCompleted: true, status: document.body.dataset.status }},
    window.location.origin
  );
</script>
</body>
</html>
"#,
        status = escape_html(result.as_str())
    )
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_page_carries_id() {
        let page = render_method_notification("8a880dc0-d2d2-4067-bcb1-b08d1690b26e");
        assert!(page.contains(r#"data-trans-id="8a880dc0-d2d2-4067-bcb1-b08d1690b26e""#));
        assert!(page.contains("methodCompleted: true"));
        assert!(page.contains("window.parent.postMessage"));
    }

    #[test]
    fn test_method_page_escapes_id() {
        let page = render_method_notification(r#""><script>alert(1)</script>"#);
        assert!(!page.contains("<script>alert(1)"));
        assert!(page.contains("&quot;&gt;&lt;script&gt;"));
    }

    #[test]
    fn test_challenge_page_status() {
        let ok = render_challenge_result(ChallengeResult::Success);
        assert!(ok.contains(r#"data-status="SUCCESS""#));
        assert!(ok.contains("challengeCompleted: true"));

        let failed = render_challenge_result(ChallengeResult::Failed);
        assert!(failed.contains(r#"data-status="FAILED""#));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a&b<c>'d\""), "a&amp;b&lt;c&gt;&#x27;d&quot;");
        assert_eq!(escape_html("plain-id"), "plain-id");
    }
}
