//! Local (offset-less) timestamps as exchanged with the web client.

use time::{
    format_description::{well_known::Iso8601, FormatItem},
    macros::format_description,
    OffsetDateTime, PrimitiveDateTime,
};

const LOCAL_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

/// Parses `2024-05-01T08:30:00`, with or without fractional seconds.
pub fn parse_local(raw: &str) -> Option<PrimitiveDateTime> {
    let raw = raw.trim();
    PrimitiveDateTime::parse(raw, LOCAL_FORMAT)
        .or_else(|_| PrimitiveDateTime::parse(raw, &Iso8601::PARSING))
        .ok()
}

pub fn format_local(value: &PrimitiveDateTime) -> Result<String, time::error::Format> {
    value.format(LOCAL_FORMAT)
}

pub fn now_local() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();
    PrimitiveDateTime::new(now.date(), now.time())
}

/// `#[serde(with = "iso_local")]` for `PrimitiveDateTime` fields.
pub mod iso_local {
    use serde::{de, ser, Deserialize, Deserializer, Serializer};
    use time::PrimitiveDateTime;

    pub fn serialize<S: Serializer>(value: &PrimitiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        let text = super::format_local(value).map_err(ser::Error::custom)?;
        serializer.serialize_str(&text)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PrimitiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_local(&raw).ok_or_else(|| de::Error::custom(format!("invalid local date-time: {raw}")))
    }

    /// Same format for `Option<PrimitiveDateTime>`; pair with `#[serde(default)]`.
    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer};
        use time::PrimitiveDateTime;

        pub fn serialize<S: Serializer>(
            value: &Option<PrimitiveDateTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(v) => super::serialize(v, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<PrimitiveDateTime>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                None => Ok(None),
                Some(raw) => super::super::parse_local(&raw)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid local date-time: {raw}"))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn parses_plain_and_fractional_timestamps() {
        assert_eq!(parse_local("2024-05-01T08:30:00"), Some(datetime!(2024-05-01 08:30:00)));
        assert_eq!(
            parse_local(" 2024-05-01T08:30:00.250 "),
            Some(datetime!(2024-05-01 08:30:00.25))
        );
        assert_eq!(parse_local("yesterday"), None);
    }

    #[test]
    fn serde_uses_offsetless_format() {
        #[derive(serde::Serialize, serde::Deserialize)]
        struct Wrapper {
            #[serde(with = "iso_local")]
            at: PrimitiveDateTime,
            #[serde(default, with = "iso_local::option")]
            maybe: Option<PrimitiveDateTime>,
        }
        let json = serde_json::to_string(&Wrapper {
            at: datetime!(2024-05-01 08:30:00),
            maybe: None,
        })
        .unwrap();
        assert_eq!(json, r#"{"at":"2024-05-01T08:30:00","maybe":null}"#);

        let back: Wrapper = serde_json::from_str(r#"{"at":"2024-05-01T08:30:00"}"#).unwrap();
        assert!(back.maybe.is_none());
    }
}
