//! Fixed building-area and usage-type identifiers understood by the room search.
//!
//! The portal expects numeric ids in its search form. The tables are plain
//! enums with exhaustive `id()` matches, so they are built at compile time and
//! can never be mutated at runtime.

use clap::ValueEnum;

/// Building areas ("Gebäudebereiche") selectable in the room search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Building {
    Stammgelaende,
    Garching,
    GarchingHochbrueck,
    Weihenstephan,
    Straubing,
    Olympiapark,
    KlinikumRechtsDerIsar,
    Heilbronn,
    MuenchenSonstige,
    Ottobrunn,
    Freising,
}

impl Building {
    /// Numeric id sent as `pGebaeudebereich`.
    pub const fn id(self) -> u32 {
        match self {
            Self::Stammgelaende => 31,
            Self::Garching => 33,
            Self::GarchingHochbrueck => 34,
            Self::Weihenstephan => 35,
            Self::Straubing => 36,
            Self::Olympiapark => 37,
            Self::KlinikumRechtsDerIsar => 38,
            Self::Heilbronn => 39,
            Self::MuenchenSonstige => 40,
            Self::Ottobrunn => 42,
            Self::Freising => 43,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Stammgelaende => "München Stammgelände",
            Self::Garching => "Garching Forschungszentrum",
            Self::GarchingHochbrueck => "Garching-Hochbrück",
            Self::Weihenstephan => "Weihenstephan",
            Self::Straubing => "Straubing",
            Self::Olympiapark => "München Olympiapark",
            Self::KlinikumRechtsDerIsar => "Klinikum rechts der Isar",
            Self::Heilbronn => "Heilbronn",
            Self::MuenchenSonstige => "München (sonstige)",
            Self::Ottobrunn => "Ottobrunn",
            Self::Freising => "Freising",
        }
    }
}

/// Room usage types ("Verwendungen") selectable in the room search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Usage {
    LectureHall,
    SeminarRoom,
    ExerciseRoom,
    ComputerRoom,
    Laboratory,
    PracticalLab,
    MeetingRoom,
    StudyRoom,
    Library,
    ReadingRoom,
    DrawingRoom,
    ExamRoom,
    GroupRoom,
    MediaRoom,
    Workshop,
    SportsHall,
    Auditorium,
    MultiPurpose,
}

impl Usage {
    /// Numeric id sent as `pVerwendung`.
    pub const fn id(self) -> u32 {
        match self {
            Self::LectureHall => 41,
            Self::SeminarRoom => 42,
            Self::ExerciseRoom => 43,
            Self::ComputerRoom => 44,
            Self::Laboratory => 45,
            Self::PracticalLab => 46,
            Self::MeetingRoom => 47,
            Self::StudyRoom => 48,
            Self::Library => 49,
            Self::ReadingRoom => 50,
            Self::DrawingRoom => 51,
            Self::ExamRoom => 52,
            Self::GroupRoom => 53,
            Self::MediaRoom => 54,
            Self::Workshop => 55,
            Self::SportsHall => 56,
            Self::Auditorium => 57,
            Self::MultiPurpose => 58,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::LectureHall => "Hörsaal",
            Self::SeminarRoom => "Seminarraum",
            Self::ExerciseRoom => "Übungsraum",
            Self::ComputerRoom => "PC-Raum",
            Self::Laboratory => "Labor",
            Self::PracticalLab => "Praktikumsraum",
            Self::MeetingRoom => "Besprechungsraum",
            Self::StudyRoom => "Lernraum",
            Self::Library => "Bibliothek",
            Self::ReadingRoom => "Lesesaal",
            Self::DrawingRoom => "Zeichensaal",
            Self::ExamRoom => "Prüfungsraum",
            Self::GroupRoom => "Gruppenraum",
            Self::MediaRoom => "Medienraum",
            Self::Workshop => "Werkstatt",
            Self::SportsHall => "Sporthalle",
            Self::Auditorium => "Aula",
            Self::MultiPurpose => "Mehrzweckraum",
        }
    }
}
