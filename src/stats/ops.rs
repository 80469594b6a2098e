use std::collections::HashMap;

use serde::Serialize;

use crate::event_file::traits::PlayerId;
use crate::stats::{ratio_for, PlayerToRatio};

/// The sum of an on-base ratio and slugging. Either side may be missing, in
/// which case the sum is too.
#[derive(Debug, Default, PartialEq, Copy, Clone, Serialize)]
pub struct Composite {
    pub on_base: Option<f64>,
    pub slugging: Option<f64>,
}

impl Composite {
    pub fn value(&self) -> Option<f64> {
        Some(self.on_base? + self.slugging?)
    }
}

pub type PlayerToComposite = HashMap<PlayerId, Composite>;

fn combine(on_base: &PlayerToRatio, slugging: &PlayerToRatio) -> PlayerToComposite {
    on_base
        .keys()
        .chain(slugging.keys())
        .map(|player| {
            let composite = Composite {
                on_base: ratio_for(on_base, player).value(),
                slugging: ratio_for(slugging, player).value(),
            };
            (player.clone(), composite)
        })
        .collect()
}

pub fn player_to_ops(player_to_obp: &PlayerToRatio, player_to_sp: &PlayerToRatio) -> PlayerToComposite {
    combine(player_to_obp, player_to_sp)
}

/// Like OPS, with conditional OBP in place of OBP.
pub fn player_to_cops(
    player_to_cobp: &PlayerToRatio,
    player_to_sp: &PlayerToRatio,
) -> PlayerToComposite {
    combine(player_to_cobp, player_to_sp)
}
