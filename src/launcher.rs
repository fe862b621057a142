use std::process::{Command, Stdio};

use anyhow::{Result, anyhow};

/// Builds the click-to-launch links (WhatsApp, phone, e-mail, remote
/// desktop) and hands them to the platform opener.

/// Digits-only phone with the Brazilian country code prefixed when missing.
/// Local numbers are 10-11 digits (area code + number).
fn phone_digits(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return digits;
    }
    if digits.starts_with("55") && digits.len() >= 12 {
        digits
    } else {
        format!("55{}", digits)
    }
}

pub fn whatsapp_link(phone: &str, message: Option<&str>) -> String {
    let phone = phone_digits(phone);
    match message {
        Some(message) if !message.is_empty() => {
            format!("https://wa.me/{}?text={}", phone, urlencoding::encode(message))
        }
        _ => format!("https://wa.me/{}", phone),
    }
}

pub fn tel_link(phone: &str) -> String {
    let digits: String = phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();
    format!("tel:{}", digits)
}

pub fn mailto_link(email: &str) -> String {
    format!("mailto:{}", email.trim())
}

pub fn teamviewer_link(id: &str) -> String {
    let digits: String = id.chars().filter(|c| c.is_ascii_digit()).collect();
    format!("teamviewer8://control?device={}", digits)
}

pub fn teamviewer_web_link(id: &str) -> String {
    let digits: String = id.chars().filter(|c| c.is_ascii_digit()).collect();
    format!("https://start.teamviewer.com/{}", digits)
}

pub fn anydesk_link(id: &str) -> String {
    let id: String = id.chars().filter(|c| !c.is_whitespace()).collect();
    format!("anydesk:{}", id)
}

pub fn anydesk_web_link() -> String {
    "https://anydesk.com/pt/downloads".to_string()
}

/// Open a link with the platform opener. Waits for the opener to exit so a
/// missing protocol handler is reported back to the caller.
pub fn open(url: &str) -> Result<()> {
    let status = opener(url)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| anyhow!("Não foi possível abrir o link: {}", e))?;

    if !status.success() {
        return Err(anyhow!("Não foi possível abrir {}", url));
    }
    Ok(())
}

/// Try a vendor URI first and fall back to its web page when the opener
/// fails (no handler installed for the scheme).
pub fn open_with_fallback(uri: &str, web_url: &str) -> Result<()> {
    if open(uri).is_ok() {
        return Ok(());
    }
    open(web_url)
}

#[cfg(target_os = "macos")]
fn opener(url: &str) -> Command {
    let mut command = Command::new("open");
    command.arg(url);
    command
}

#[cfg(target_os = "windows")]
fn opener(url: &str) -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", "", url]);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener(url: &str) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(url);
    command
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whatsapp_link_prefixes_country_code() {
        assert_eq!(
            whatsapp_link("(11) 98765-4321", None),
            "https://wa.me/5511987654321"
        );
        // Already has the country code
        assert_eq!(
            whatsapp_link("+55 11 98765-4321", None),
            "https://wa.me/5511987654321"
        );
    }

    #[test]
    fn whatsapp_link_encodes_message() {
        let link = whatsapp_link("11987654321", Some("Olá, tudo bem?"));
        assert_eq!(
            link,
            "https://wa.me/5511987654321?text=Ol%C3%A1%2C%20tudo%20bem%3F"
        );
    }

    #[test]
    fn tel_link_keeps_plus_and_digits() {
        assert_eq!(tel_link("+55 (11) 3322-1100"), "tel:+551133221100");
    }

    #[test]
    fn mailto_link_trims() {
        assert_eq!(mailto_link(" ana@example.com "), "mailto:ana@example.com");
    }

    #[test]
    fn remote_desktop_links() {
        assert_eq!(
            teamviewer_link("123 456 789"),
            "teamviewer8://control?device=123456789"
        );
        assert_eq!(
            teamviewer_web_link("123 456 789"),
            "https://start.teamviewer.com/123456789"
        );
        assert_eq!(anydesk_link("987 654 321"), "anydesk:987654321");
    }
}
