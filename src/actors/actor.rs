//! Runtime state of a single actor

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::actors::capability::ActorCapabilities;
use crate::actors::status::StatusEffects;
use crate::actors::template::{ActorTemplate, AiArchetype, TownRole};
use crate::core::calendar::TimeOfDay;
use crate::core::types::Coord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepSchedule {
    pub day: bool,
    pub night: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CloneSpec {
    /// Chance per acting tick to divide
    pub rate: f32,
    /// Living actors of the same template at which cloning stops
    pub max_population: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorState {
    pub template_id: String,
    pub name: String,
    pub tags: Vec<String>,
    pub archetype: AiArchetype,
    pub town_role: Option<TownRole>,
    pub level: i32,

    pub position: Coord,
    /// Ticks since the actor last acted
    pub move_counter: u32,

    pub detection_range: i32,
    pub perception_bonus: i32,
    /// Currently tracking the player (range and line of sight)
    pub aware_of_player: bool,
    /// Has ever spotted the player; never cleared
    pub has_spotted_player: bool,
    pub hostile: bool,

    pub capabilities: ActorCapabilities,
    pub hp: i32,
    pub max_hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub mana: i32,
    pub max_mana: i32,
    pub flee_chance: i32,

    pub sleeping: bool,
    pub sleep_schedule: SleepSchedule,
    pub status: StatusEffects,
    pub cloning: Option<CloneSpec>,

    /// Death animation progress; `Some` once hp reaches zero
    pub death_frames: Option<u32>,
}

impl ActorState {
    /// Instantiate a template at `depth`. The pacing counter starts at a
    /// random phase so a group doesn't move in lockstep.
    pub fn spawn<R: Rng>(
        template: &ActorTemplate,
        depth: i32,
        position: Coord,
        move_interval: u32,
        rng: &mut R,
    ) -> Self {
        let level = ActorTemplate::level_for_depth(depth);
        let max_hp = template.hp_base + level * template.hp_per_level;
        let cloning = template.clone_cap().filter(|_| template.clone_rate > 0.0).map(|cap| CloneSpec {
            rate: template.clone_rate,
            max_population: cap,
        });

        Self {
            template_id: template.id.clone(),
            name: template.name.clone(),
            tags: template.tags.clone(),
            archetype: template.ai_type,
            town_role: template.town_role(),
            level,
            position,
            move_counter: rng.gen_range(0..move_interval.max(1)),
            detection_range: template.detection_range,
            perception_bonus: template.perception_bonus,
            aware_of_player: false,
            has_spotted_player: false,
            hostile: template.hostile,
            capabilities: ActorCapabilities::resolve(template),
            hp: max_hp,
            max_hp,
            attack: template.attack_base + level * template.attack_per_level,
            defense: template.defense_base + level * template.defense_per_level,
            mana: template.mana,
            max_mana: template.max_mana.unwrap_or(template.mana),
            flee_chance: template.flee_chance,
            sleeping: false,
            sleep_schedule: SleepSchedule {
                day: template.sleeps_during_day,
                night: template.sleeps_during_night,
            },
            status: StatusEffects::new(),
            cloning,
            death_frames: None,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    pub fn hp_ratio(&self) -> f32 {
        self.hp as f32 / self.max_hp.max(1) as f32
    }

    /// Perception for the stealth roll
    pub fn perception_value(&self) -> i32 {
        self.level / 4 + self.perception_bonus
    }

    /// Sleep according to the schedule for this time of day
    pub fn update_sleep(&mut self, time: TimeOfDay) {
        self.sleeping = match time {
            TimeOfDay::Day => self.sleep_schedule.day,
            TimeOfDay::Night => self.sleep_schedule.night,
        };
    }

    pub fn wake(&mut self) {
        self.sleeping = false;
        self.aware_of_player = true;
    }

    /// Returns true if this damage killed the actor
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if amount <= 0 || self.is_dead() {
            return false;
        }
        self.hp -= amount;
        if self.hp <= 0 {
            self.hp = 0;
            self.death_frames = Some(0);
            return true;
        }
        false
    }

    /// Advance the death animation; true once it has run `duration` frames
    pub fn advance_death(&mut self, duration: u32) -> bool {
        let frames = self.death_frames.map_or(1, |f| f + 1);
        self.death_frames = Some(frames);
        frames >= duration
    }

    /// Count a tick toward the next action; true when the actor may act
    pub fn pace(&mut self, interval: u32) -> bool {
        self.move_counter += 1;
        if self.move_counter >= interval.max(1) {
            self.move_counter = 0;
            true
        } else {
            false
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// A fresh copy of this actor at `position`: full health and mana, no
    /// effects, no knowledge of the player
    pub fn offspring(&self, position: Coord, move_counter: u32) -> Self {
        Self {
            position,
            move_counter,
            aware_of_player: false,
            has_spotted_player: false,
            hp: self.max_hp,
            mana: self.max_mana,
            sleeping: false,
            status: StatusEffects::new(),
            death_frames: None,
            ..self.clone()
        }
    }
}
