//! Asynchronous sound dispatch.
//!
//! [`ChannelSound`] turns every hook into a message on an `mpsc` channel and
//! returns at once.  A worker thread drains the channel and hands each effect
//! to a player callback.  Nobody waits for playback; if the worker is gone the
//! message is dropped.

use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use crate::services::SoundService;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    Bullet,
    EnemyBullet,
    ShipExplosion,
    AsteroidExplosion,
    EnemyShipExplosion,
    ChuckNorris,
    ChuckNorrisExplosion,
}

/// Sends effects to a background player.
#[derive(Clone, Debug)]
pub struct ChannelSound {
    tx: Sender<SoundEffect>,
}

impl ChannelSound {
    pub fn new(tx: Sender<SoundEffect>) -> Self {
        Self { tx }
    }

    /// Spawn a worker thread that calls `play` for every dispatched effect.
    /// The worker exits once every `ChannelSound` clone has been dropped.
    pub fn spawn<F>(mut play: F) -> (Self, JoinHandle<()>)
    where
        F: FnMut(SoundEffect) + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<SoundEffect>();
        let handle = thread::spawn(move || {
            for effect in rx {
                play(effect);
            }
            tracing::debug!("sound worker stopped");
        });
        (Self::new(tx), handle)
    }

    fn dispatch(&self, effect: SoundEffect) {
        if self.tx.send(effect).is_err() {
            tracing::trace!(?effect, "sound worker gone; effect dropped");
        }
    }
}

// Enemy bullet, asteroid explosion and enemy-ship explosion stay silent.
impl SoundService for ChannelSound {
    fn play_bullet_sound(&self) {
        self.dispatch(SoundEffect::Bullet);
    }

    fn play_ship_explosion_sound(&self) {
        self.dispatch(SoundEffect::ShipExplosion);
    }

    fn play_chuck_norris_sound(&self) {
        self.dispatch(SoundEffect::ChuckNorris);
    }

    fn play_chuck_norris_explosion_sound(&self) {
        self.dispatch(SoundEffect::ChuckNorrisExplosion);
    }
}
