//! WAV playback from the SD card
//!
//! The player runs on its own once started; [`Playback`] is the handle that
//! adjusts and stops it, and stops it when dropped.

use super::check_status;
use crate::config::MAX_WAV_VOLUME;
use crate::error::{Error, Result};
use crate::{debug, error};

/// Playback volume, `0..=MAX_WAV_VOLUME`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub struct Volume(u8);

impl Volume {
    /// Loudest setting
    pub const MAX: Self = Self(MAX_WAV_VOLUME);

    /// Create a volume
    ///
    /// # Errors
    ///
    /// [`Error::InvalidVolume`] above [`MAX_WAV_VOLUME`].
    pub const fn new(level: u8) -> Result<Self> {
        if level > MAX_WAV_VOLUME {
            Err(Error::InvalidVolume(level))
        } else {
            Ok(Self(level))
        }
    }

    /// Volume level
    #[must_use]
    pub const fn level(self) -> u8 {
        self.0
    }
}

/// Background WAV player
pub trait WavPlayer {
    /// Start playing `file`, returning 0 on success or a driver status code
    fn play(&mut self, file: &str) -> i32;

    /// Change the volume of the current playback
    fn set_volume(&mut self, volume: Volume);

    /// Stop playback
    fn stop(&mut self);
}

/// Handle to a running playback, stops it when dropped
pub struct Playback<'a, P: WavPlayer> {
    player: &'a mut P,
}

impl<'a, P: WavPlayer> Playback<'a, P> {
    /// Change the volume
    ///
    /// # Errors
    ///
    /// [`Error::InvalidVolume`] above [`MAX_WAV_VOLUME`].
    pub fn set_volume(&mut self, level: u8) -> Result<()> {
        let volume = Volume::new(level)?;
        self.player.set_volume(volume);
        Ok(())
    }

    /// Stop playback
    pub fn stop(self) {}
}

impl<P: WavPlayer> Drop for Playback<'_, P> {
    fn drop(&mut self) {
        self.player.stop();
        debug!("wav playback stopped");
    }
}

/// Start playing `file` in the background
///
/// # Errors
///
/// [`Error::Driver`] with the player's status if it cannot start.
pub fn wav_play<'a, P: WavPlayer>(player: &'a mut P, file: &str) -> Result<Playback<'a, P>> {
    let status = player.play(file);
    if status != 0 {
        error!("wav playback failed with status {}", status);
    }
    check_status(status)?;
    Ok(Playback { player })
}
