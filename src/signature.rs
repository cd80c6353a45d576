use std::fmt;

/// Content types which can be recognised from the first bytes of a payload
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    Png,
    Sound,
    Font,
    Model,
    Piff,
    Language,
    Unknown,
}

/// Checked in order, first match wins
const SIGNATURES: &[(&[u8], Kind)] = &[
    (b"\x89PNG\r\n\x1a\n", Kind::Png),
    (b"PSND", Kind::Sound),
    (b"PFNT", Kind::Font),
    (b"PMOD", Kind::Model),
    (b"PIFF", Kind::Piff),
    (b"LANG", Kind::Language),
];

impl Kind {
    /// Classify `data` by its prefix
    ///
    /// Data shorter than a signature never matches it.
    pub fn detect(data: &[u8]) -> Kind {
        SIGNATURES
            .iter()
            .find(|(prefix, _)| data.starts_with(prefix))
            .map_or(Kind::Unknown, |&(_, kind)| kind)
    }

    /// The file extension used for artifacts of this kind
    pub fn extension(self) -> &'static str {
        match self {
            Kind::Png => "png",
            Kind::Sound => "psnd",
            Kind::Font => "pfnt",
            Kind::Model => "pmod",
            Kind::Piff => "piff",
            Kind::Language => "lang",
            Kind::Unknown => "unknown",
        }
    }

    pub fn is_known(self) -> bool {
        self != Kind::Unknown
    }
}

impl Default for Kind {
    fn default() -> Self {
        Kind::Unknown
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.extension())
    }
}
