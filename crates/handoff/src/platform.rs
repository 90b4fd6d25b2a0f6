/// Environment readings used to pick a handoff path.
///
/// Collected fresh on every AR request; nothing here is cached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformSignals {
    pub user_agent: String,
    /// `navigator.platform`, e.g. `MacIntel`.
    pub platform: String,
    pub max_touch_points: u32,
    /// Old IE/Trident exposes an `MSStream` global and also claims to be an iPhone.
    pub legacy_trident: bool,
}

impl PlatformSignals {
    pub fn from_user_agent(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Platform {
    Android,
    Ios,
    HarmonyCapable,
    Unsupported,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Platform::Android => "android",
            Platform::Ios => "ios",
            Platform::HarmonyCapable => "harmony",
            Platform::Unsupported => "unsupported",
        };
        f.write_str(s)
    }
}

pub trait PlatformClassifier {
    fn classify(&self, signals: &PlatformSignals) -> Platform;
}

/// User-agent sniffing, checked in priority order Android, iOS, Harmony.
#[derive(Debug, Default, Clone, Copy)]
pub struct UserAgentClassifier;

impl UserAgentClassifier {
    fn is_android(signals: &PlatformSignals) -> bool {
        signals.user_agent.to_ascii_lowercase().contains("android")
    }

    fn is_ios(signals: &PlatformSignals) -> bool {
        let ua = &signals.user_agent;
        let idevice = ["iPad", "iPhone", "iPod"].iter().any(|m| ua.contains(m));
        // iPadOS reports itself as a Mac; touch support gives it away.
        let ipad_as_mac = signals.platform == "MacIntel" && signals.max_touch_points > 1;
        (idevice || ipad_as_mac) && !signals.legacy_trident
    }

    fn is_huawei(signals: &PlatformSignals) -> bool {
        let ua = &signals.user_agent;
        ua.contains("HUAWEI") || ua.contains("Huawei")
    }
}

impl PlatformClassifier for UserAgentClassifier {
    fn classify(&self, signals: &PlatformSignals) -> Platform {
        if Self::is_android(signals) {
            Platform::Android
        } else if Self::is_ios(signals) {
            Platform::Ios
        } else if Self::is_huawei(signals) {
            Platform::HarmonyCapable
        } else {
            Platform::Unsupported
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PIXEL: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Mobile Safari/537.36";
    const IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1";
    const IPAD_DESKTOP: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15";
    const HUAWEI_HARMONY: &str = "Mozilla/5.0 (Phone; OpenHarmony 4.0) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0 Safari/537.36 ArkWeb/4.1 Mobile HuaweiBrowser/5.0";
    const DESKTOP_CHROME: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

    fn classify(signals: PlatformSignals) -> Platform {
        UserAgentClassifier.classify(&signals)
    }

    #[test]
    fn android_user_agent() {
        assert_eq!(classify(PlatformSignals::from_user_agent(PIXEL)), Platform::Android);
    }

    #[test]
    fn android_match_is_case_insensitive() {
        assert_eq!(
            classify(PlatformSignals::from_user_agent("custom ANDROID webview")),
            Platform::Android
        );
    }

    #[test]
    fn iphone_user_agent() {
        assert_eq!(classify(PlatformSignals::from_user_agent(IPHONE)), Platform::Ios);
    }

    #[test]
    fn ipad_reporting_as_mac_with_touch_is_ios() {
        let signals = PlatformSignals {
            user_agent: IPAD_DESKTOP.to_string(),
            platform: "MacIntel".to_string(),
            max_touch_points: 5,
            legacy_trident: false,
        };
        assert_eq!(classify(signals), Platform::Ios);
    }

    #[test]
    fn real_mac_without_touch_is_unsupported() {
        let signals = PlatformSignals {
            user_agent: IPAD_DESKTOP.to_string(),
            platform: "MacIntel".to_string(),
            max_touch_points: 0,
            legacy_trident: false,
        };
        assert_eq!(classify(signals), Platform::Unsupported);
    }

    #[test]
    fn trident_claiming_iphone_is_not_ios() {
        let signals = PlatformSignals {
            user_agent: "Mozilla/5.0 (Windows Phone 10.0; Android 4.2.1; iPhone) Edge".to_string(),
            legacy_trident: true,
            ..PlatformSignals::default()
        };
        // Still Android: that check runs first.
        assert_eq!(classify(signals), Platform::Android);

        let signals = PlatformSignals {
            user_agent: "Mozilla/5.0 (compatible; MSIE 10.0; iPhone)".to_string(),
            legacy_trident: true,
            ..PlatformSignals::default()
        };
        assert_eq!(classify(signals), Platform::Unsupported);
    }

    #[test]
    fn huawei_without_android_marker_is_harmony() {
        assert_eq!(
            classify(PlatformSignals::from_user_agent(HUAWEI_HARMONY)),
            Platform::HarmonyCapable
        );
        assert_eq!(
            classify(PlatformSignals::from_user_agent("HUAWEI browser")),
            Platform::HarmonyCapable
        );
    }

    #[test]
    fn huawei_android_phone_takes_android_path() {
        let ua = "Mozilla/5.0 (Linux; Android 10; HUAWEI P30) Chrome/120.0 Mobile";
        assert_eq!(classify(PlatformSignals::from_user_agent(ua)), Platform::Android);
    }

    #[test]
    fn desktop_is_unsupported() {
        assert_eq!(
            classify(PlatformSignals::from_user_agent(DESKTOP_CHROME)),
            Platform::Unsupported
        );
        assert_eq!(classify(PlatformSignals::default()), Platform::Unsupported);
    }
}
