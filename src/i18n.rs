//! 화면 문자열 번역. 내장 ko/en 표 위에 `locales/<code>.toml` 언어팩을 덮어쓸 수 있다.
//!
//! 언어팩은 평평한 `"menu.title" = "..."` 형식이나 `[menu]` 섹션 형식 모두 읽는다.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

/// 언어팩 기본 디렉터리
pub const PACK_DIR: &str = "locales";

/// 번역 키.
pub mod keys {
    pub const ERROR_PREFIX: &str = "error.prefix";
    pub const APP_EXIT: &str = "app.exit";

    pub const MAIN_MENU_TITLE: &str = "menu.title";
    pub const MAIN_MENU_STATE_POINT: &str = "menu.state_point";
    pub const MAIN_MENU_MIXING: &str = "menu.mixing";
    pub const MAIN_MENU_SCENARIO: &str = "menu.scenario";
    pub const MAIN_MENU_SETTINGS: &str = "menu.settings";
    pub const MAIN_MENU_EXIT: &str = "menu.exit";
    pub const PROMPT_MENU_SELECT: &str = "menu.prompt";
    pub const PROMPT_SELECT: &str = "input.choice";
    pub const INVALID_SELECTION_RETRY: &str = "error.menu_retry";
    pub const INVALID_SELECTION: &str = "error.choice";
    pub const ERROR_INVALID_NUMBER: &str = "error.not_a_number";

    pub const STATE_HEADING: &str = "state.heading";
    pub const STATE_PAIR_OPTIONS: &str = "state.pairs";
    pub const PROMPT_LABEL: &str = "input.label";
    pub const PROMPT_TDB: &str = "input.tdb";
    pub const PROMPT_RH: &str = "input.rh";
    pub const PROMPT_TWB: &str = "input.twb";
    pub const PROMPT_W: &str = "input.w";
    pub const PROMPT_TDP: &str = "input.tdp";
    pub const PROMPT_H: &str = "input.h";

    pub const MIXING_HEADING: &str = "mixing.heading";
    pub const MIXING_STREAM_A: &str = "mixing.stream_1";
    pub const MIXING_STREAM_B: &str = "mixing.stream_2";
    pub const PROMPT_MASS_FLOW: &str = "input.mass_flow";

    pub const SCENARIO_HEADING: &str = "scenario.heading";
    pub const SCENARIO_PROMPT_PATH: &str = "scenario.path";

    pub const SETTINGS_HEADING: &str = "settings.heading";
    pub const SETTINGS_CURRENT: &str = "settings.current";
    pub const SETTINGS_OPTIONS: &str = "settings.items";
    pub const SETTINGS_PROMPT_CHANGE: &str = "settings.choose";
    pub const SETTINGS_PROMPT_PRESSURE: &str = "settings.pressure";
    pub const SETTINGS_PROMPT_PRESSURE_UNIT: &str = "settings.pressure_unit";
    pub const SETTINGS_PROMPT_ALTITUDE: &str = "settings.altitude";
    pub const SETTINGS_PROMPT_PRECISION: &str = "settings.precision";
    pub const SETTINGS_PROMPT_LANGUAGE: &str = "settings.language";
    pub const SETTINGS_INVALID: &str = "settings.unchanged";
    pub const SETTINGS_SAVED: &str = "settings.saved";
}

/// (키, 한국어, 영어)
const MESSAGES: &[(&str, &str, &str)] = &[
    (keys::ERROR_PREFIX, "오류", "Error"),
    (keys::APP_EXIT, "종료합니다.", "Bye."),
    (
        keys::MAIN_MENU_TITLE,
        "\n=== 습공기 선도 계산기 ===",
        "\n=== Psychrometric Toolbox ===",
    ),
    (keys::MAIN_MENU_STATE_POINT, "1) 상태점 계산", "1) State point"),
    (keys::MAIN_MENU_MIXING, "2) 공기 혼합", "2) Air mixing"),
    (
        keys::MAIN_MENU_SCENARIO,
        "3) AHU/FCU 시나리오 실행",
        "3) Run AHU/FCU scenario",
    ),
    (keys::MAIN_MENU_SETTINGS, "4) 설정", "4) Settings"),
    (keys::MAIN_MENU_EXIT, "0) 나가기", "0) Quit"),
    (keys::PROMPT_MENU_SELECT, "번호: ", "Menu number: "),
    (keys::PROMPT_SELECT, "번호 선택: ", "Choice: "),
    (
        keys::INVALID_SELECTION_RETRY,
        "메뉴에 없는 번호입니다.",
        "No such menu item.",
    ),
    (keys::INVALID_SELECTION, "없는 번호입니다.", "No such choice."),
    (
        keys::ERROR_INVALID_NUMBER,
        "숫자로 입력해 주세요.",
        "Enter a numeric value.",
    ),
    (keys::STATE_HEADING, "\n[상태점 계산]", "\n[State point]"),
    (
        keys::STATE_PAIR_OPTIONS,
        "입력 조합: 1) 건구+상대습도  2) 건구+습구  3) 건구+습도비  4) 건구+이슬점  5) 엔탈피+습도비",
        "Inputs: 1) Tdb+RH  2) Tdb+Twb  3) Tdb+W  4) Tdb+Tdp  5) h+W",
    ),
    (keys::PROMPT_LABEL, "라벨(엔터=기본값): ", "Label (Enter=default): "),
    (keys::PROMPT_TDB, "건구온도 [°C]: ", "Dry-bulb [°C]: "),
    (keys::PROMPT_RH, "상대습도 [%]: ", "Relative humidity [%]: "),
    (keys::PROMPT_TWB, "습구온도 [°C]: ", "Wet-bulb [°C]: "),
    (keys::PROMPT_W, "절대습도 [g/kg]: ", "Humidity ratio [g/kg]: "),
    (keys::PROMPT_TDP, "이슬점 [°C]: ", "Dew point [°C]: "),
    (keys::PROMPT_H, "비엔탈피 [kJ/kg]: ", "Enthalpy [kJ/kg]: "),
    (keys::MIXING_HEADING, "\n[공기 혼합]", "\n[Air mixing]"),
    (keys::MIXING_STREAM_A, "- 흐름 1", "- Stream 1"),
    (keys::MIXING_STREAM_B, "- 흐름 2", "- Stream 2"),
    (keys::PROMPT_MASS_FLOW, "건공기 유량 [kg/s]: ", "Dry-air flow [kg/s]: "),
    (keys::SCENARIO_HEADING, "\n[시나리오]", "\n[Scenario]"),
    (
        keys::SCENARIO_PROMPT_PATH,
        "시나리오 파일(.toml): ",
        "Scenario file (.toml): ",
    ),
    (keys::SETTINGS_HEADING, "\n[설정]", "\n[Settings]"),
    (keys::SETTINGS_CURRENT, "현재 값:", "Current values:"),
    (
        keys::SETTINGS_OPTIONS,
        "1) 대기압  2) 고도로 대기압 설정  3) 표시 자릿수  4) 언어",
        "1) Pressure  2) Pressure from altitude  3) Precision  4) Language",
    ),
    (
        keys::SETTINGS_PROMPT_CHANGE,
        "바꿀 항목(엔터=취소): ",
        "Item to change (Enter=cancel): ",
    ),
    (keys::SETTINGS_PROMPT_PRESSURE, "대기압 값: ", "Pressure value: "),
    (
        keys::SETTINGS_PROMPT_PRESSURE_UNIT,
        "단위 pa/kpa/mbar/bar/psi/atm/mmhg (엔터=현재 단위): ",
        "Unit pa/kpa/mbar/bar/psi/atm/mmhg (Enter=current): ",
    ),
    (keys::SETTINGS_PROMPT_ALTITUDE, "해발고도 [m]: ", "Altitude [m]: "),
    (keys::SETTINGS_PROMPT_PRECISION, "소수 자릿수(0~10): ", "Decimals (0-10): "),
    (
        keys::SETTINGS_PROMPT_LANGUAGE,
        "언어 auto/ko/en (다음 실행부터 적용): ",
        "Language auto/ko/en (applies on next start): ",
    ),
    (
        keys::SETTINGS_INVALID,
        "입력이 올바르지 않아 그대로 둡니다.",
        "Invalid value; setting unchanged.",
    ),
    (keys::SETTINGS_SAVED, "config.toml에 저장했습니다.", "Saved to config.toml."),
];

/// 지원 언어.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    Ko,
    En,
}

impl Language {
    /// `ko`, `en-US`, `ko_KR.UTF-8` 같은 태그에서 언어를 고른다. `auto`나 모르는 태그는 `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag.trim().split(['-', '_', '.']).next()?.to_ascii_lowercase();
        match primary.as_str() {
            "ko" => Some(Language::Ko),
            "en" => Some(Language::En),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::Ko => "ko",
            Language::En => "en",
        }
    }
}

fn builtin(lang: Language, key: &str) -> Option<&'static str> {
    MESSAGES
        .iter()
        .find(|(k, _, _)| *k == key)
        .map(|(_, ko, en)| match lang {
            Language::Ko => *ko,
            Language::En => *en,
        })
}

/// 언어와 (선택적) 언어팩을 묶은 번역기.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    lang: Language,
    pack: HashMap<String, String>,
}

impl Translator {
    pub fn new(lang: Language) -> Self {
        Self {
            lang,
            pack: HashMap::new(),
        }
    }

    /// `dir/<code>.toml` 언어팩을 읽어 내장 문자열 위에 덮어쓴다.
    /// 파일이 없으면 조용히, 파싱에 실패하면 경고 후 내장 문자열만 쓴다.
    pub fn with_pack_dir(lang: Language, dir: &Path) -> Self {
        let path = dir.join(format!("{}.toml", lang.code()));
        let pack = match fs::read_to_string(&path) {
            Ok(src) => match flatten_pack(&src) {
                Ok(pack) => {
                    debug!(path = %path.display(), entries = pack.len(), "언어팩 로드");
                    pack
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "언어팩을 읽지 못했습니다");
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };
        Self { lang, pack }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    /// 언어팩 → 선택 언어 → 한국어 순으로 찾고, 모두 없으면 키를 그대로 돌려준다.
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        if let Some(text) = self.pack.get(key) {
            return text;
        }
        builtin(self.lang, key)
            .or_else(|| builtin(Language::Ko, key))
            .unwrap_or(key)
    }
}

/// 명령행 → 설정 → 시스템 로케일 순으로 언어를 정한다. 끝내 모르면 영어.
pub fn resolve_language(cli: Option<&str>, config: &str) -> Language {
    [cli, Some(config)]
        .into_iter()
        .flatten()
        .find_map(Language::from_tag)
        .or_else(system_language)
        .unwrap_or(Language::En)
}

/// 시스템 로케일 목록에서 처음으로 지원하는 언어.
pub fn system_language() -> Option<Language> {
    sys_locale::get_locales().find_map(|tag| Language::from_tag(&tag))
}

// 중첩 테이블을 점(.)으로 이은 키로 펼친다. 문자열이 아닌 값은 무시한다.
fn flatten_pack(src: &str) -> Result<HashMap<String, String>, toml::de::Error> {
    let root: toml::Table = toml::from_str(src)?;
    let mut out = HashMap::new();
    let mut pending = vec![(String::new(), root)];
    while let Some((prefix, table)) = pending.pop() {
        for (name, value) in table {
            let key = if prefix.is_empty() {
                name
            } else {
                format!("{prefix}.{name}")
            };
            match value {
                toml::Value::String(text) => {
                    out.insert(key, text);
                }
                toml::Value::Table(inner) => pending.push((key, inner)),
                _ => {}
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_key_has_both_languages() {
        for (key, ko, en) in MESSAGES {
            assert!(!ko.is_empty() && !en.is_empty(), "{key}");
        }
        let mut seen: Vec<&str> = MESSAGES.iter().map(|(k, _, _)| *k).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), MESSAGES.len());
    }

    #[test]
    fn unknown_key_is_returned_as_is() {
        let tr = Translator::new(Language::En);
        assert_eq!(tr.t(keys::ERROR_PREFIX), "Error");
        assert_eq!(tr.t("no.such.key"), "no.such.key");
    }

    #[test]
    fn tags_map_to_languages() {
        assert_eq!(Language::from_tag("ko_KR.UTF-8"), Some(Language::Ko));
        assert_eq!(Language::from_tag("en-US"), Some(Language::En));
        assert_eq!(Language::from_tag("auto"), None);
        assert_eq!(Language::from_tag("fr"), None);
    }

    #[test]
    fn cli_flag_wins_over_config() {
        assert_eq!(resolve_language(Some("en"), "ko"), Language::En);
        assert_eq!(resolve_language(Some("auto"), "ko-KR"), Language::Ko);
        assert_eq!(resolve_language(None, "en"), Language::En);
    }

    #[test]
    fn sections_flatten_to_dotted_keys() {
        let pack = flatten_pack("\"error.prefix\" = \"Oops\"\n[app]\nexit = \"Ciao\"\n")
            .expect("pack");
        assert_eq!(pack.get(keys::ERROR_PREFIX).map(String::as_str), Some("Oops"));
        assert_eq!(pack.get(keys::APP_EXIT).map(String::as_str), Some("Ciao"));
    }

    #[test]
    fn pack_overrides_builtin_text() {
        let tr = Translator {
            lang: Language::Ko,
            pack: flatten_pack("[menu]\nexit = \"0) 끝\"\n").expect("pack"),
        };
        assert_eq!(tr.t(keys::MAIN_MENU_EXIT), "0) 끝");
        assert_eq!(tr.t(keys::MAIN_MENU_SETTINGS), "4) 설정");
    }
}
