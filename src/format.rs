use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{Result, WifiConfError};
use crate::profile::ConfigRecord;

/// A profile file syntax. Each profile lives in its own file; the loader and
/// the reconciler only go through this trait.
pub trait ConfigFormat: Send + Sync {
    /// Short name used in logs and settings.
    fn name(&self) -> &'static str;

    /// Extracts `(ssid, passphrase)` from the full text of a profile file.
    fn parse(&self, text: &str) -> Result<(String, String)>;

    /// Renders the full text of the file backing `record`.
    fn serialize(&self, record: &ConfigRecord) -> String;
}

/// Selects one of the built-in formats from the settings file or the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    Dotfile,
    #[default]
    Netctl,
}

impl FormatKind {
    pub fn build(self) -> Box<dyn ConfigFormat> {
        match self {
            FormatKind::Dotfile => Box::new(DotfileFormat),
            FormatKind::Netctl => Box::new(NetctlFormat),
        }
    }
}

/// `ssid=...` / `passwd=...` dotfile.
#[derive(Debug, Clone, Copy, Default)]
pub struct DotfileFormat;

impl DotfileFormat {
    /// Consumes a `<key>=<value>\n` line from the start of `text`.
    /// Returns the value and whatever follows the newline.
    fn take_line<'a>(text: &'a str, key: &str) -> Result<(&'a str, &'a str)> {
        let rest = text
            .strip_prefix(key)
            .and_then(|r| r.strip_prefix('='))
            .ok_or_else(|| WifiConfError::parse(format!("expected a '{}=' line", key)))?;

        let (value, rest) = rest.split_once('\n').ok_or_else(|| {
            WifiConfError::parse(format!("'{}' line is not terminated by a newline", key))
        })?;

        if value.is_empty() {
            return Err(WifiConfError::parse(format!("'{}' has an empty value", key)));
        }

        Ok((value, rest))
    }
}

impl ConfigFormat for DotfileFormat {
    fn name(&self) -> &'static str {
        "dotfile"
    }

    fn parse(&self, text: &str) -> Result<(String, String)> {
        let (ssid, rest) = Self::take_line(text, "ssid")?;
        let (passwd, _) = Self::take_line(rest, "passwd")?;
        Ok((ssid.to_string(), passwd.to_string()))
    }

    fn serialize(&self, record: &ConfigRecord) -> String {
        format!("ssid={}\npasswd={}\n", record.ssid(), record.passphrase())
    }
}

/// netctl wireless profile.
///
/// Keys are matched on prefix only: anything starting with `ESSID` counts as
/// the ESSID and anything starting with `Key` counts as the key, so
/// `KeyMgmt=` or `ESSIDFoo=` lines are picked up too. Matching is
/// case-sensitive.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetctlFormat;

impl ConfigFormat for NetctlFormat {
    fn name(&self) -> &'static str {
        "netctl"
    }

    fn parse(&self, text: &str) -> Result<(String, String)> {
        let mut essid = "";
        let mut key = "";

        for line in text.lines() {
            let Some((name, value)) = line.split_once('=') else {
                continue;
            };

            if name.starts_with("ESSID") {
                essid = value;
            } else if name.starts_with("Key") {
                key = value;
            }
        }

        let essid = unquote(essid);
        let key = unquote(key);

        if essid.is_empty() {
            return Err(WifiConfError::parse("missing ESSID"));
        }
        if key.is_empty() {
            return Err(WifiConfError::parse("missing Key"));
        }

        Ok((essid.to_string(), key.to_string()))
    }

    fn serialize(&self, record: &ConfigRecord) -> String {
        format!(
            "Description={}\n\
             Interface=wlan0\n\
             Connection=wireless\n\
             Security=wpa\n\
             IP=dhcp\n\
             ESSID={}\n\
             Key={}\n",
            record.profile_name(),
            quote(record.ssid()),
            quote(record.passphrase()),
        )
    }
}

/// Strips one layer of surrounding double quotes, if present.
pub fn unquote(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// Quotes `value` when it contains a space, or when it is already wrapped in
/// quotes and would otherwise lose them to [`unquote`] on the next read.
pub fn quote(value: &str) -> String {
    if value.contains(' ') || unquote(value) != value {
        format!("\"{}\"", value)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn record(profile: &str, ssid: &str, passphrase: &str) -> ConfigRecord {
        ConfigRecord::new(profile, PathBuf::from(profile), ssid, passphrase)
    }

    #[test]
    fn dotfile_parses_two_lines() {
        let (ssid, pass) = DotfileFormat
            .parse("ssid=My Wifi\npasswd=p=ss \"word\"\n")
            .expect("should parse");
        assert_eq!(ssid, "My Wifi");
        assert_eq!(pass, "p=ss \"word\"");
    }

    #[test]
    fn dotfile_keeps_quotes() {
        let (ssid, _) = DotfileFormat
            .parse("ssid=\"quoted\"\npasswd=x\n")
            .expect("should parse");
        assert_eq!(ssid, "\"quoted\"");
    }

    #[test]
    fn dotfile_ignores_trailing_lines() {
        let (ssid, pass) = DotfileFormat
            .parse("ssid=a\npasswd=b\n# comment\nextra=1\n")
            .expect("should parse");
        assert_eq!((ssid.as_str(), pass.as_str()), ("a", "b"));
    }

    #[test]
    fn dotfile_rejects_malformed_text() {
        let bad = [
            "",
            "passwd=b\nssid=a\n",
            "ssid=a\n",
            "ssid=\npasswd=b\n",
            "ssid=a\npasswd=\n",
            "ssid=a\npasswd=b",
            " ssid=a\npasswd=b\n",
            "ssid a\npasswd=b\n",
        ];
        for text in bad {
            assert!(DotfileFormat.parse(text).is_err(), "accepted {:?}", text);
        }
    }

    #[test]
    fn dotfile_round_trip() {
        let before = record("home", " spaced = ssid ", "\"pw\"");
        let text = DotfileFormat.serialize(&before);
        let (ssid, pass) = DotfileFormat.parse(&text).expect("should reparse");
        assert_eq!(ssid, before.ssid());
        assert_eq!(pass, before.passphrase());
    }

    #[test]
    fn netctl_parses_quoted_and_bare_values() {
        let text = "Description=home\nInterface=wlan0\nESSID=\"My Wifi\"\nKey=secret123\n";
        let (ssid, pass) = NetctlFormat.parse(text).expect("should parse");
        assert_eq!(ssid, "My Wifi");
        assert_eq!(pass, "secret123");
    }

    #[test]
    fn netctl_last_occurrence_wins() {
        let text = "ESSID=first\nKey=one\nESSID=second\nKey=two\n";
        let (ssid, pass) = NetctlFormat.parse(text).expect("should parse");
        assert_eq!((ssid.as_str(), pass.as_str()), ("second", "two"));
    }

    #[test]
    fn netctl_matches_on_key_prefix() {
        let text = "ESSID=net\nKey=real\nKeyMgmt=psk\n";
        let (_, pass) = NetctlFormat.parse(text).expect("should parse");
        assert_eq!(pass, "psk");
    }

    #[test]
    fn netctl_prefix_match_is_case_sensitive() {
        let text = "essid=net\nkey=pw\n";
        assert!(NetctlFormat.parse(text).is_err());
    }

    #[test]
    fn netctl_value_keeps_embedded_equals() {
        let (_, pass) = NetctlFormat
            .parse("ESSID=net\nKey=a=b=c\n")
            .expect("should parse");
        assert_eq!(pass, "a=b=c");
    }

    #[test]
    fn netctl_requires_both_values() {
        assert!(NetctlFormat.parse("ESSID=net\n").is_err());
        assert!(NetctlFormat.parse("Key=pw\n").is_err());
        assert!(NetctlFormat.parse("ESSID=\nKey=pw\n").is_err());
        assert!(NetctlFormat.parse("ESSID=\"\"\nKey=pw\n").is_err());
    }

    #[test]
    fn netctl_serializes_fixed_template() {
        let text = NetctlFormat.serialize(&record("home.profile", "New Wifi", "topsecret"));
        assert_eq!(
            text,
            "Description=home.profile\nInterface=wlan0\nConnection=wireless\n\
             Security=wpa\nIP=dhcp\nESSID=\"New Wifi\"\nKey=topsecret\n"
        );
    }

    #[test]
    fn netctl_round_trips_awkward_values() {
        for value in ["plain", "with space", " lead", "\"wrapped\"", "\"half", "a\"b c"] {
            let before = record("p", value, value);
            let (ssid, pass) = NetctlFormat
                .parse(&NetctlFormat.serialize(&before))
                .expect("should reparse");
            assert_eq!(ssid, value);
            assert_eq!(pass, value);
        }
    }

    #[test]
    fn unquote_strips_one_layer() {
        assert_eq!(unquote("\"a b\""), "a b");
        assert_eq!(unquote("\"\"x\"\""), "\"x\"");
        assert_eq!(unquote("\""), "\"");
        assert_eq!(unquote("bare"), "bare");
    }

    #[test]
    fn format_kind_builds_matching_format() {
        assert_eq!(FormatKind::Dotfile.build().name(), "dotfile");
        assert_eq!(FormatKind::Netctl.build().name(), "netctl");
        assert_eq!(FormatKind::default(), FormatKind::Netctl);
    }
}
