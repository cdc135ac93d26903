use alloc::string::String;
use core::ops::{Deref, DerefMut};

/// Stable index of an [`Instrument`] within its [`Song`](super::Song).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InstrumentId(pub(crate) usize);

impl InstrumentId {
    /// The index into [`Song::instruments`](super::Song::instruments)
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Stable index of a [`Drum`] within its [`Song`](super::Song).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DrumId(pub(crate) usize);

impl DrumId {
    /// The index into [`Song::drums`](super::Song::drums)
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A non-owning reference to an instrument or drum of the owning song.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InstrumentRef {
    /// A melodic instrument
    Instrument(InstrumentId),
    /// A drum kit
    Drum(DrumId),
}

impl From<InstrumentId> for InstrumentRef {
    fn from(id: InstrumentId) -> Self {
        Self::Instrument(id)
    }
}

impl From<DrumId> for InstrumentRef {
    fn from(id: DrumId) -> Self {
        Self::Drum(id)
    }
}

#[doc = r#"
Sound settings shared by instruments and drums.

Values are passed through from the MIDI controllers that set them and are
not rescaled: `bank` is the 14-bit bank select (MSB in the high byte, LSB
in the low byte), the rest are raw controller or program values.
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InstrumentSettings {
    /// Display name
    pub name: Option<String>,
    /// Bank select, `MSB << 8 | LSB`
    pub bank: u16,
    /// Program number
    pub patch: u8,
    /// Channel volume (controller `0x07`)
    pub volume: u8,
    /// Pan (controller `0x0A`)
    pub pan: u8,
    /// Reverb send (controller `0x5B`)
    pub reverb: u8,
    /// Coarse tuning
    pub tune_coarse: i8,
    /// Fine tuning
    pub tune_fine: i8,
}

impl Default for InstrumentSettings {
    fn default() -> Self {
        Self {
            name: None,
            bank: 0,
            patch: 0,
            volume: 100,
            pan: 64,
            reverb: 0,
            tune_coarse: 0,
            tune_fine: 0,
        }
    }
}

impl InstrumentSettings {
    /// Set the bank select MSB, keeping the LSB
    pub fn set_bank_msb(&mut self, value: u8) {
        self.bank = (self.bank & 0x00FF) | (u16::from(value) << 8);
    }

    /// Set the bank select LSB, keeping the MSB
    pub fn set_bank_lsb(&mut self, value: u8) {
        self.bank = (self.bank & 0xFF00) | u16::from(value);
    }
}

/// A melodic instrument.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instrument {
    id: InstrumentId,
    settings: InstrumentSettings,
}

impl Instrument {
    pub(crate) fn new(id: InstrumentId) -> Self {
        Self {
            id,
            settings: InstrumentSettings::default(),
        }
    }

    /// The index assigned when the instrument was added
    pub const fn id(&self) -> InstrumentId {
        self.id
    }
}

impl Deref for Instrument {
    type Target = InstrumentSettings;
    fn deref(&self) -> &Self::Target {
        &self.settings
    }
}

impl DerefMut for Instrument {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.settings
    }
}

/// A drum kit: an instrument with a few extra fields this crate does not interpret.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Drum {
    id: DrumId,
    settings: InstrumentSettings,
    /// Opaque per-drum values
    pub unmodeled: [u8; 4],
}

impl Drum {
    pub(crate) fn new(id: DrumId) -> Self {
        Self {
            id,
            settings: InstrumentSettings::default(),
            unmodeled: [0; 4],
        }
    }

    /// The index assigned when the drum was added
    pub const fn id(&self) -> DrumId {
        self.id
    }
}

impl Deref for Drum {
    type Target = InstrumentSettings;
    fn deref(&self) -> &Self::Target {
        &self.settings
    }
}

impl DerefMut for Drum {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.settings
    }
}

#[test]
fn bank_select_halves() {
    use pretty_assertions::assert_eq;
    let mut settings = InstrumentSettings::default();
    settings.set_bank_lsb(0x05);
    settings.set_bank_msb(0x01);
    assert_eq!(settings.bank, 0x0105);
    settings.set_bank_lsb(0x7F);
    assert_eq!(settings.bank, 0x017F);
}
