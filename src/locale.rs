//! Localized day, month and am/pm names.
//!
//! Names come from an embedded dataset keyed by locale code (`en`, `en_US`,
//! `fil_PH`, ...), taken from the glibc `LC_TIME` tables as published by the
//! `pure-rust-locales` crate. Lookups never fail: a locale falls back to its
//! language, then to a fixed country variant of its language, then to English.

use crate::consts::DEFAULT_LANGUAGE;
use crate::Error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

static I18N_JSON: &str = include_str!("../data/i18n.json");

/// ISO 639-3 codes of every language with an ISO 639-1 form, sorted by the
/// three-letter code
#[rustfmt::skip]
const LANGUAGE_CODES: &[(&str, &str)] = &[
    ("aar", "aa"), ("abk", "ab"), ("afr", "af"), ("aka", "ak"), ("amh", "am"), ("ara", "ar"),
    ("arg", "an"), ("asm", "as"), ("ava", "av"), ("ave", "ae"), ("aym", "ay"), ("aze", "az"),
    ("bak", "ba"), ("bam", "bm"), ("bel", "be"), ("ben", "bn"), ("bis", "bi"), ("bod", "bo"),
    ("bos", "bs"), ("bre", "br"), ("bul", "bg"), ("cat", "ca"), ("ces", "cs"), ("cha", "ch"),
    ("che", "ce"), ("chu", "cu"), ("chv", "cv"), ("cor", "kw"), ("cos", "co"), ("cre", "cr"),
    ("cym", "cy"), ("dan", "da"), ("deu", "de"), ("div", "dv"), ("dzo", "dz"), ("ell", "el"),
    ("eng", "en"), ("epo", "eo"), ("est", "et"), ("eus", "eu"), ("ewe", "ee"), ("fao", "fo"),
    ("fas", "fa"), ("fij", "fj"), ("fin", "fi"), ("fra", "fr"), ("fry", "fy"), ("ful", "ff"),
    ("gla", "gd"), ("gle", "ga"), ("glg", "gl"), ("glv", "gv"), ("grn", "gn"), ("guj", "gu"),
    ("hat", "ht"), ("hau", "ha"), ("heb", "he"), ("her", "hz"), ("hin", "hi"), ("hmo", "ho"),
    ("hrv", "hr"), ("hun", "hu"), ("hye", "hy"), ("ibo", "ig"), ("ido", "io"), ("iii", "ii"),
    ("iku", "iu"), ("ile", "ie"), ("ina", "ia"), ("ind", "id"), ("ipk", "ik"), ("isl", "is"),
    ("ita", "it"), ("jav", "jv"), ("jpn", "ja"), ("kal", "kl"), ("kan", "kn"), ("kas", "ks"),
    ("kat", "ka"), ("kau", "kr"), ("kaz", "kk"), ("khm", "km"), ("kik", "ki"), ("kin", "rw"),
    ("kir", "ky"), ("kom", "kv"), ("kon", "kg"), ("kor", "ko"), ("kua", "kj"), ("kur", "ku"),
    ("lao", "lo"), ("lat", "la"), ("lav", "lv"), ("lim", "li"), ("lin", "ln"), ("lit", "lt"),
    ("ltz", "lb"), ("lub", "lu"), ("lug", "lg"), ("mah", "mh"), ("mal", "ml"), ("mar", "mr"),
    ("mkd", "mk"), ("mlg", "mg"), ("mlt", "mt"), ("mon", "mn"), ("mri", "mi"), ("msa", "ms"),
    ("mya", "my"), ("nau", "na"), ("nav", "nv"), ("nbl", "nr"), ("nde", "nd"), ("ndo", "ng"),
    ("nep", "ne"), ("nld", "nl"), ("nno", "nn"), ("nob", "nb"), ("nor", "no"), ("nya", "ny"),
    ("oci", "oc"), ("oji", "oj"), ("ori", "or"), ("orm", "om"), ("oss", "os"), ("pan", "pa"),
    ("pli", "pi"), ("pol", "pl"), ("por", "pt"), ("pus", "ps"), ("que", "qu"), ("roh", "rm"),
    ("ron", "ro"), ("run", "rn"), ("rus", "ru"), ("sag", "sg"), ("san", "sa"), ("sin", "si"),
    ("slk", "sk"), ("slv", "sl"), ("sme", "se"), ("smo", "sm"), ("sna", "sn"), ("snd", "sd"),
    ("som", "so"), ("sot", "st"), ("spa", "es"), ("sqi", "sq"), ("srd", "sc"), ("srp", "sr"),
    ("ssw", "ss"), ("sun", "su"), ("swa", "sw"), ("swe", "sv"), ("tah", "ty"), ("tam", "ta"),
    ("tat", "tt"), ("tel", "te"), ("tgk", "tg"), ("tgl", "tl"), ("tha", "th"), ("tir", "ti"),
    ("ton", "to"), ("tsn", "tn"), ("tso", "ts"), ("tuk", "tk"), ("tur", "tr"), ("twi", "tw"),
    ("uig", "ug"), ("ukr", "uk"), ("urd", "ur"), ("uzb", "uz"), ("ven", "ve"), ("vie", "vi"),
    ("vol", "vo"), ("wln", "wa"), ("wol", "wo"), ("xho", "xh"), ("yid", "yi"), ("yor", "yo"),
    ("zha", "za"), ("zho", "zh"), ("zul", "zu"),
];

/// A language, optionally narrowed to a country, e.g. `eng-US` or `spa`.
///
/// Languages are ISO 639-3 codes (two-letter ISO 639-1 codes are accepted too),
/// countries ISO 3166-1 alpha-2 codes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale {
    language: String,
    country: Option<String>,
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            language: "eng".to_owned(),
            country: Some("US".to_owned()),
        }
    }
}

impl Locale {
    /// Creates a locale, normalizing case.
    ///
    /// # Errors
    /// Returns `Error::InvalidLocale` if the language isn't 2-3 letters or the
    /// country isn't 2 letters.
    pub fn new(language: &str, country: Option<&str>) -> Result<Self, Error> {
        let invalid = || {
            Error::InvalidLocale(match country {
                Some(country) => format!("{language}-{country}"),
                None => language.to_owned(),
            })
        };

        if !(2..=3).contains(&language.len())
            || !language.bytes().all(|b| b.is_ascii_alphabetic())
        {
            return Err(invalid());
        }
        if let Some(country) = country {
            if country.len() != 2 || !country.bytes().all(|b| b.is_ascii_alphabetic()) {
                return Err(invalid());
            }
        }

        Ok(Self {
            language: language.to_ascii_lowercase(),
            country: country.map(str::to_ascii_uppercase),
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    /// The two-letter form of the language, if it has one
    pub fn iso639_1(&self) -> Option<&str> {
        if self.language.len() == 2 {
            return Some(&self.language);
        }
        LANGUAGE_CODES
            .binary_search_by_key(&self.language.as_str(), |&(three, _)| three)
            .ok()
            .map(|index| LANGUAGE_CODES[index].1)
    }

    /// Key of this locale in the names dataset, e.g. `en_US`. Languages
    /// without a two-letter form keep their three-letter code, e.g. `fil_PH`.
    pub fn dataset_code(&self) -> String {
        let language = self.iso639_1().unwrap_or(&self.language);
        match &self.country {
            Some(country) => format!("{language}_{country}"),
            None => language.to_owned(),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.country {
            Some(country) => write!(f, "{}-{}", self.language, country),
            None => write!(f, "{}", self.language),
        }
    }
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once(['-', '_']) {
            Some((language, country)) => Self::new(language, Some(country)),
            None => Self::new(s.trim(), None),
        }
    }
}

impl TryFrom<String> for Locale {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.to_string()
    }
}

/// Day, month and am/pm names for one locale. Days start on Sunday, months on January.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Translation {
    pub days: [String; 7],
    pub short_days: [String; 7],
    pub months: [String; 12],
    pub short_months: [String; 12],
    pub am_pm: [String; 2],
}

impl Translation {
    /// The best translation for a locale. Never fails.
    pub fn for_locale(locale: &Locale) -> &'static Self {
        translations().resolve(locale)
    }
}

/// All loaded translations plus, per language, the country variant used when a
/// locale matches neither exactly nor by language.
#[derive(Debug)]
struct Translations {
    by_code: BTreeMap<String, Translation>,
    backdowns: BTreeMap<String, String>,
    fallback: Translation,
}

impl Translations {
    fn load(json: &str) -> Result<Self, serde_json::Error> {
        let by_code: BTreeMap<String, Translation> = serde_json::from_str(json)?;

        let fallback = by_code.get(DEFAULT_LANGUAGE).cloned().ok_or_else(|| {
            <serde_json::Error as serde::de::Error>::custom(format!(
                "missing translation for default language '{DEFAULT_LANGUAGE}'"
            ))
        })?;

        // BTreeMap iterates codes in sorted order, so the first country variant wins
        let mut backdowns = BTreeMap::new();
        for code in by_code.keys() {
            if let Some((language, _)) = code.split_once('_') {
                backdowns
                    .entry(language.to_owned())
                    .or_insert_with(|| code.clone());
            }
        }

        Ok(Self {
            by_code,
            backdowns,
            fallback,
        })
    }

    fn resolve(&self, locale: &Locale) -> &Translation {
        let code = locale.dataset_code();
        if let Some(translation) = self.by_code.get(&code) {
            return translation;
        }

        let language = code.split_once('_').map_or(code.as_str(), |(language, _)| language);
        if let Some(translation) = self.by_code.get(language) {
            return translation;
        }

        if let Some(translation) = self
            .backdowns
            .get(language)
            .and_then(|backdown| self.by_code.get(backdown))
        {
            tracing::debug!(%locale, language, "using backdown translation");
            return translation;
        }

        tracing::debug!(%locale, "no translation for language, using default");
        &self.fallback
    }
}

#[allow(clippy::expect_used)]
fn translations() -> &'static Translations {
    static TRANSLATIONS: OnceLock<Translations> = OnceLock::new();
    TRANSLATIONS.get_or_init(|| {
        Translations::load(I18N_JSON).expect("embedded translation data is malformed")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn locale(s: &str) -> Locale {
        s.parse().unwrap()
    }

    #[test]
    fn test_locale_parse_and_display() {
        let parsed = locale("eng-US");
        assert_eq!(parsed.language(), "eng");
        assert_eq!(parsed.country(), Some("US"));
        assert_eq!(parsed.to_string(), "eng-US");

        assert_eq!(locale("spa").to_string(), "spa");
        assert_eq!(locale("pt_br").to_string(), "pt-BR");
    }

    #[test]
    fn test_locale_parse_invalid() {
        for input in ["", "e", "english", "eng-USA", "en1", "eng-"] {
            assert!(input.parse::<Locale>().is_err(), "{input:?} should be invalid");
        }
    }

    #[test]
    fn test_locale_serde() {
        let json = serde_json::to_string(&locale("zho-TW")).unwrap();
        assert_eq!(json, "\"zho-TW\"");
        let parsed: Locale = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, locale("zho-TW"));
    }

    #[test]
    fn test_dataset_code() {
        assert_eq!(locale("eng-US").dataset_code(), "en_US");
        assert_eq!(locale("kin").dataset_code(), "rw");
        assert_eq!(locale("en-GB").dataset_code(), "en_GB");
        assert_eq!(locale("ell-GR").dataset_code(), "el_GR");
        assert_eq!(locale("fil-PH").dataset_code(), "fil_PH");
        assert_eq!(locale("xyz-US").dataset_code(), "xyz_US");
    }

    #[test]
    fn test_translation_for_locale() {
        struct TestCase {
            locale: &'static str,
            sun: &'static str,
            sunday: &'static str,
            jan: &'static str,
            january: &'static str,
            am: &'static str,
        }

        let cases = [
            TestCase { locale: "eng-US", sun: "Sun", sunday: "Sunday", jan: "Jan", january: "January", am: "AM" },
            TestCase { locale: "eng-GB", sun: "Sun", sunday: "Sunday", jan: "Jan", january: "January", am: "am" },
            TestCase { locale: "eng", sun: "Sun", sunday: "Sunday", jan: "Jan", january: "January", am: "am" },
            TestCase { locale: "spa-EC", sun: "dom", sunday: "domingo", jan: "ene", january: "enero", am: "" },
            TestCase { locale: "spa", sun: "dom", sunday: "domingo", jan: "ene", january: "enero", am: "" },
            TestCase { locale: "por-BR", sun: "dom", sunday: "domingo", jan: "jan", january: "janeiro", am: "" },
            TestCase { locale: "por-PT", sun: "dom", sunday: "domingo", jan: "jan", january: "janeiro", am: "" },
            TestCase { locale: "por", sun: "dom", sunday: "domingo", jan: "jan", january: "janeiro", am: "" },
            TestCase { locale: "kin-RW", sun: "Mwe", sunday: "Ku cyumweru", jan: "Mut", january: "Mutarama", am: "" },
            TestCase { locale: "kin", sun: "Mwe", sunday: "Ku cyumweru", jan: "Mut", january: "Mutarama", am: "" },
            TestCase { locale: "zho-CN", sun: "日", sunday: "星期日", jan: "1月", january: "一月", am: "上午" },
            TestCase { locale: "zho-HK", sun: "日", sunday: "星期日", jan: "1月", january: "一月", am: "上午" },
            TestCase { locale: "zho-SG", sun: "日", sunday: "星期日", jan: "一月", january: "一月", am: "上午" },
            TestCase { locale: "zho-TW", sun: "日", sunday: "週日", jan: " 1月", january: "一月", am: "上午" },
            // no plain zh entry, backs down to the first zh country variant
            TestCase { locale: "zho", sun: "日", sunday: "星期日", jan: "1月", january: "一月", am: "上午" },
        ];

        for case in &cases {
            let translation = Translation::for_locale(&locale(case.locale));
            assert_eq!(translation.short_days[0], case.sun, "short day mismatch for {}", case.locale);
            assert_eq!(translation.days[0], case.sunday, "full day mismatch for {}", case.locale);
            assert_eq!(translation.short_months[0], case.jan, "short month mismatch for {}", case.locale);
            assert_eq!(translation.months[0], case.january, "full month mismatch for {}", case.locale);
            assert_eq!(translation.am_pm[0], case.am, "AM mismatch for {}", case.locale);
        }
    }

    #[test]
    fn test_backdown_is_deterministic() {
        // no fr_SN or plain fr entry, fr_BE sorts first among the fr countries
        let first = Translation::for_locale(&locale("fra-SN"));
        for _ in 0..10 {
            assert!(std::ptr::eq(first, Translation::for_locale(&locale("fra-SN"))));
        }
        assert!(std::ptr::eq(first, Translation::for_locale(&locale("fra-BE"))));
        assert!(std::ptr::eq(first, Translation::for_locale(&locale("fra"))));
        assert_eq!(first.months[0], "janvier");
    }

    #[test]
    fn test_widely_spoken_languages_are_translated() {
        struct TestCase {
            locale: &'static str,
            sunday: &'static str,
            january: &'static str,
        }

        let cases = [
            TestCase { locale: "ita-IT", sunday: "domenica", january: "gennaio" },
            TestCase { locale: "rus-RU", sunday: "Воскресенье", january: "января" },
            TestCase { locale: "jpn-JP", sunday: "日曜日", january: "1月" },
            TestCase { locale: "nld-NL", sunday: "zondag", january: "januari" },
            TestCase { locale: "swa-KE", sunday: "Jumapili", january: "Januari" },
            TestCase { locale: "ell-GR", sunday: "Κυριακή", january: "Ιανουαρίου" },
            TestCase { locale: "deu-DE", sunday: "Sonntag", january: "Januar" },
            // de_AT sorts first, so plain deu backs down to Austrian names
            TestCase { locale: "deu", sunday: "Sonntag", january: "Jänner" },
            TestCase { locale: "fil-PH", sunday: "Linggo", january: "Enero" },
        ];

        for case in &cases {
            let translation = Translation::for_locale(&locale(case.locale));
            assert_eq!(translation.days[0], case.sunday, "{}", case.locale);
            assert_eq!(translation.months[0], case.january, "{}", case.locale);
        }
    }

    #[test]
    fn test_language_codes_sorted_and_complete() {
        assert_eq!(LANGUAGE_CODES.len(), 183);
        assert!(LANGUAGE_CODES.windows(2).all(|pair| pair[0].0 < pair[1].0));
        for (three, two) in LANGUAGE_CODES {
            assert_eq!(locale(three).iso639_1(), Some(*two), "{three}");
        }
    }

    #[test]
    fn test_dataset_matches_glibc_tables() {
        use pure_rust_locales::{locale_match, Locale as GlibcLocale};

        let translations = Translations::load(I18N_JSON).unwrap();
        assert!(translations.by_code.len() > 300);
        // glibc copies es_EC names from es_BO
        assert!(translations.by_code.contains_key("es_EC"));
        for (code, translation) in &translations.by_code {
            let Ok(glibc) = GlibcLocale::try_from(code.as_str()) else {
                assert_eq!(code, DEFAULT_LANGUAGE);
                continue;
            };
            assert_eq!(translation.days.as_slice(), locale_match!(glibc => LC_TIME::DAY), "{code}");
            assert_eq!(translation.short_days.as_slice(), locale_match!(glibc => LC_TIME::ABDAY), "{code}");
            assert_eq!(translation.months.as_slice(), locale_match!(glibc => LC_TIME::MON), "{code}");
            assert_eq!(translation.short_months.as_slice(), locale_match!(glibc => LC_TIME::ABMON), "{code}");
            assert_eq!(translation.am_pm.as_slice(), locale_match!(glibc => LC_TIME::AM_PM), "{code}");
        }
        assert_eq!(translations.by_code.get(DEFAULT_LANGUAGE), translations.by_code.get("en_GB"));
    }

    #[test]
    fn test_unknown_language_uses_default() {
        let translation = Translation::for_locale(&locale("xyz-US"));
        assert_eq!(translation.days[0], "Sunday");
        assert_eq!(translation.am_pm[0], "am");

        let translation = Translation::for_locale(&locale("xx"));
        assert_eq!(translation.months[0], "January");
    }

    #[test]
    fn test_load_rejects_malformed_data() {
        assert!(Translations::load("not json").is_err());
        assert!(Translations::load(r#"{"en": {"days": ["Sunday"]}}"#).is_err());
        // well formed but without the default language
        let embedded: BTreeMap<String, serde_json::Value> =
            serde_json::from_str(I18N_JSON).unwrap();
        let without_default: BTreeMap<_, _> =
            embedded.into_iter().filter(|(code, _)| code != DEFAULT_LANGUAGE).collect();
        let json = serde_json::to_string(&without_default).unwrap();
        assert!(Translations::load(&json).is_err());
    }

    #[test]
    fn test_backdowns_pick_first_sorted_country() {
        let translations = Translations::load(I18N_JSON).unwrap();
        assert_eq!(translations.backdowns.get("zh").map(String::as_str), Some("zh_CN"));
        assert_eq!(translations.backdowns.get("fr").map(String::as_str), Some("fr_BE"));
        assert_eq!(translations.backdowns.get("pt").map(String::as_str), Some("pt_BR"));
        assert_eq!(translations.backdowns.get("es").map(String::as_str), Some("es_AR"));
    }
}
