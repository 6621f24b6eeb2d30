//! Static journey content: card symbols, reflective questions, the letter,
//! and the voice message catalogue.

use serde::{Deserialize, Serialize};

/// A voice message in the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: u32,
    pub title: String,
    pub description: String,
    /// Static path of the audio resource.
    pub source: String,
}

impl Track {
    pub fn new(
        id: u32,
        title: impl Into<String>,
        description: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            source: source.into(),
        }
    }
}

/// A reflective question asked in the Q&A section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// The question text. Doubles as the answer key.
    pub text: String,
    pub icon: String,
    pub placeholder: String,
}

impl Question {
    pub fn new(
        text: impl Into<String>,
        icon: impl Into<String>,
        placeholder: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            icon: icon.into(),
            placeholder: placeholder.into(),
        }
    }
}

/// Path of the looping background music.
pub const BACKGROUND_MUSIC: &str = "/music/background.mp3";

/// Key under which the closing memory is saved.
pub const MEMORY_KEY: &str = "birthday-memory";

/// Quote stored alongside the answers.
pub const CLOSING_QUOTE: &str =
    "Setiap hari adalah halaman baru dalam kisah hidupmu. Tulislah yang indah.";

pub const LETTER: &str = "Kakakku yang tersayang,

Terima kasih telah menjadi bagian terindah dalam hidupku. Setiap momen bersamamu adalah kenangan yang tak ternilai harganya.

Di hari spesialmu ini, aku ingin kamu tahu betapa berharganya dirimu. Kamu selalu menjadi inspirasi, pelindung, dan sahabat terbaikku.

Semoga tahun ini membawa lebih banyak kebahagiaan, cinta, dan mimpi yang terwujud untukmu.

Dengan sepenuh hati,
Adikmu ❤️";

lazy_static::lazy_static! {
    /// Card faces for the memory game. Each appears twice in a deck.
    pub static ref SYMBOLS: Vec<String> = ["🌸", "🦋", "🌈", "🎀", "⭐", "💝"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    pub static ref QUESTIONS: Vec<Question> = vec![
        Question::new(
            "Apa momen paling bahagia tahun ini?",
            "✨",
            "Ceritakan momen indahmu...",
        ),
        Question::new(
            "Siapa orang yang selalu kamu syukuri?",
            "💕",
            "Tuliskan nama dan alasannya...",
        ),
        Question::new(
            "Apa mimpi terbesarmu?",
            "🌟",
            "Bagikan mimpimu di sini...",
        ),
    ];

    pub static ref TRACKS: Vec<Track> = vec![
        Track::new(1, "Kenangan Masa Kecil", "Cerita tentang masa kecil kita bersama", "/audio/recording-1.mp3"),
        Track::new(2, "Permintaan Maaf", "Hal-hal yang ingin kusampaikan", "/audio/recording-2.mp3"),
        Track::new(3, "Ucapan Terima Kasih", "Untuk semua yang telah kamu berikan", "/audio/recording-3.mp3"),
        Track::new(4, "Harapan Masa Depan", "Doa dan harapanku untukmu", "/audio/recording-4.mp3"),
        Track::new(5, "Cerita Lucu", "Momen konyol yang tak terlupakan", "/audio/recording-5.mp3"),
        Track::new(6, "Pesan Terakhir", "Kata-kata dari lubuk hati terdalam", "/audio/recording-6.mp3"),
    ];
}
