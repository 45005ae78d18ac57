//! Multi-channel trigger pattern processor with learned-pattern injection.
//!
//! Watches up to [`MAX_CHANNELS`] trigger/gate lines against a shared clock,
//! learns the pattern each channel settles into, and once the pattern has been
//! stable for a configurable number of bars, periodically re-injects it with
//! one of six rhythmic transformations (microtiming, omission, roll, density
//! burst, permutation, polyrhythm) instead of passing triggers straight
//! through.
//!
//! - [`TriggerInjector`] - the processor
//! - [`SupervisorState`] - Learning / Locked / Injecting
//! - [`TrigOutMode`] - Replace or Add output bus routing
//! - [`ClockSource`] - CV or MIDI clock origin (informational; both arrive as
//!   abstract clock ticks by the time they reach [`TriggerInjector`])

use crate::common::{input_at, sample_at, Sample};

/// Maximum number of independently tracked trigger channels.
pub const MAX_CHANNELS: usize = 8;

/// Longest bar supported: 48 PPQN * 7 bars, rounded up to a clean bound.
pub const MAX_TICKS_PER_BAR: usize = 336;

const TRIGGER_THRESHOLD: f32 = 1.0;
const TRIGGER_HIGH: f32 = 5.0;
const SIMILARITY_THRESHOLD: f32 = 90.0;
const PPQN_OPTIONS: [u16; 7] = [1, 2, 4, 8, 16, 24, 48];

/// Supervisor lifecycle for a [`TriggerInjector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    Learning,
    Locked,
    Injecting,
}

/// Where the clock tick abstraction the module consumes originally came from.
/// Wire-level MIDI parsing happens upstream; this is purely a display/config flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockSource {
    Cv,
    Midi,
}

/// How a channel's output sample is combined with whatever already occupies its bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrigOutMode {
    Replace,
    Add,
}

/// Simple xorshift32 RNG, seeded independently per [`TriggerInjector`] instance.
struct Xorshift32 {
    state: u32,
}

impl Xorshift32 {
    fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    fn next(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    fn next_range(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.next() % bound
    }
}

fn is_rising_edge(current: f32, previous: f32) -> bool {
    current >= TRIGGER_THRESHOLD && previous < TRIGGER_THRESHOLD
}

fn pulse_length_samples(sample_rate: f32) -> u32 {
    ((0.010 * sample_rate).round() as u32).max(1)
}

/// bar-relative tick position for an absolute tick count, for callers that
/// track ticks as a running total instead of a per-bar counter.
pub fn bar_position(absolute_tick: u32, ppqn: u16, bar_length: u16) -> u32 {
    let ticks_per_bar = (ppqn as u32 * bar_length as u32).max(1);
    absolute_tick % ticks_per_bar
}

/// 0-indexed bar number for an absolute tick count.
pub fn bar_number(absolute_tick: u32, ppqn: u16, bar_length: u16) -> u32 {
    let ticks_per_bar = (ppqn as u32 * bar_length as u32).max(1);
    absolute_tick / ticks_per_bar
}

fn clamp_ppqn(raw: f32) -> u16 {
    let mut best = PPQN_OPTIONS[0];
    let mut best_dist = f32::MAX;
    for &opt in PPQN_OPTIONS.iter() {
        let dist = (raw - opt as f32).abs();
        if dist < best_dist {
            best_dist = dist;
            best = opt;
        }
    }
    best
}

fn should_apply_injection(fuel: u8, probability: u8, prng: &mut Xorshift32) -> bool {
    if fuel == 0 || probability == 0 {
        return false;
    }
    let scaled = (probability as u32 * fuel as u32) / 100;
    prng.next_range(100) < scaled
}

fn should_inject_this_bar(bar_counter: u32, interval: u16) -> bool {
    interval > 0 && bar_counter % interval as u32 == 0
}

#[derive(Clone)]
struct ChannelRecorder {
    hit_bar1: [bool; MAX_TICKS_PER_BAR],
    hit_bar2: [bool; MAX_TICKS_PER_BAR],
    hit_count_bar1: u16,
    hit_count_bar2: u16,
}

impl ChannelRecorder {
    fn new() -> Self {
        Self {
            hit_bar1: [false; MAX_TICKS_PER_BAR],
            hit_bar2: [false; MAX_TICKS_PER_BAR],
            hit_count_bar1: 0,
            hit_count_bar2: 0,
        }
    }

    fn clear(&mut self) {
        *self = Self::new();
    }

    /// Idempotent: re-recording a tick that is already set does not inflate the count.
    fn record_hit(&mut self, tick: usize) {
        if tick < MAX_TICKS_PER_BAR && !self.hit_bar1[tick] {
            self.hit_bar1[tick] = true;
            self.hit_count_bar1 += 1;
        }
    }

    fn similarity(&self) -> f32 {
        if self.hit_count_bar1 == 0 && self.hit_count_bar2 == 0 {
            return 100.0;
        }
        let mut matching = 0u32;
        let mut total = 0u32;
        for i in 0..MAX_TICKS_PER_BAR {
            let a = self.hit_bar1[i];
            let b = self.hit_bar2[i];
            if a && b {
                matching += 1;
            }
            if a || b {
                total += 1;
            }
        }
        if total == 0 {
            100.0
        } else {
            matching as f32 * 100.0 / total as f32
        }
    }

    fn rotate(&mut self) {
        self.hit_bar2 = self.hit_bar1;
        self.hit_count_bar2 = self.hit_count_bar1;
        self.hit_bar1 = [false; MAX_TICKS_PER_BAR];
        self.hit_count_bar1 = 0;
    }
}

#[derive(Clone)]
struct LearnedPattern {
    hits: [bool; MAX_TICKS_PER_BAR],
    hit_count: u16,
}

impl LearnedPattern {
    fn empty() -> Self {
        Self { hits: [false; MAX_TICKS_PER_BAR], hit_count: 0 }
    }

    fn snapshot_from(recorder: &ChannelRecorder) -> Self {
        Self { hits: recorder.hit_bar1, hit_count: recorder.hit_count_bar1 }
    }

    /// True when the incoming bar has drifted far enough from this snapshot
    /// that it should be treated as a different pattern (forces re-learning).
    fn differs_from(&self, incoming_bar1: &[bool; MAX_TICKS_PER_BAR]) -> bool {
        let mut matching = 0u32;
        let mut total = 0u32;
        for i in 0..MAX_TICKS_PER_BAR {
            let a = self.hits[i];
            let b = incoming_bar1[i];
            if a && b {
                matching += 1;
            }
            if a || b {
                total += 1;
            }
        }
        if total == 0 {
            return false;
        }
        (matching as f32 * 100.0 / total as f32) < SIMILARITY_THRESHOLD
    }
}

fn apply_microtiming_shift(position: i32, shift: i32, adjacent: Option<i32>) -> i32 {
    let mut new_position = position + shift;
    if let Some(adj) = adjacent {
        if new_position == adj {
            new_position = if shift > 0 { adj + 1 } else { adj - 1 };
        }
    }
    new_position.clamp(0, MAX_TICKS_PER_BAR as i32 - 1)
}

fn apply_microtiming(out: &mut [bool; MAX_TICKS_PER_BAR], ticks_per_bar: u16, ppqn: u16, prng: &mut Xorshift32) {
    let range = (ppqn / 4) as i32;
    let positions: Vec<usize> = (0..ticks_per_bar as usize).filter(|&i| out[i]).collect();
    for i in positions {
        let shift = if range > 0 {
            prng.next_range((2 * range + 1) as u32) as i32 - range
        } else {
            0
        };
        let adjacent = if i > 0 && out[i - 1] {
            Some(i as i32 - 1)
        } else if i + 1 < ticks_per_bar as usize && out[i + 1] {
            Some(i as i32 + 1)
        } else {
            None
        };
        let new_pos = apply_microtiming_shift(i as i32, shift, adjacent);
        if new_pos != i as i32 && new_pos >= 0 && (new_pos as u16) < ticks_per_bar {
            out[i] = false;
            out[new_pos as usize] = true;
        }
    }
}

fn apply_omission(
    learned: &LearnedPattern,
    out: &mut [bool; MAX_TICKS_PER_BAR],
    fuel: u8,
    prng: &mut Xorshift32,
    ticks_per_bar: u16,
) {
    let mut non_downbeat: Vec<usize> = Vec::new();
    let mut any_hits: Vec<usize> = Vec::new();
    for i in 0..ticks_per_bar as usize {
        if learned.hits[i] {
            any_hits.push(i);
            if i != 0 {
                non_downbeat.push(i);
            }
        }
    }
    if any_hits.is_empty() {
        return;
    }
    let max_omissions = (any_hits.len() + 3) / 4;
    if max_omissions == 0 {
        return;
    }
    let mut pool = if !non_downbeat.is_empty() { non_downbeat } else { any_hits };
    let slots = max_omissions.min(pool.len());
    for _ in 0..slots {
        if pool.is_empty() {
            break;
        }
        if should_apply_injection(fuel, 100, prng) {
            let idx = prng.next_range(pool.len() as u32) as usize;
            let omit_pos = pool.remove(idx);
            out[omit_pos] = false;
        }
    }
}

fn apply_roll(
    learned: &LearnedPattern,
    out: &mut [bool; MAX_TICKS_PER_BAR],
    fuel: u8,
    prng: &mut Xorshift32,
    ppqn: u16,
    ticks_per_bar: u16,
) {
    const SUBDIVISIONS: [u16; 3] = [2, 3, 4];
    if ppqn == 0 {
        return;
    }
    for i in 0..ticks_per_bar as usize {
        if !learned.hits[i] {
            continue;
        }
        if should_apply_injection(fuel, 100, prng) {
            let subdiv = SUBDIVISIONS[prng.next_range(3) as usize];
            let spacing = ppqn / subdiv;
            if spacing == 0 {
                continue;
            }
            let beat_start = (i as u16 / ppqn) * ppqn;
            let beat_end = beat_start + ppqn;
            for j in 1..subdiv {
                let pos = i as u16 + spacing * j;
                if pos < beat_end && (pos as usize) < MAX_TICKS_PER_BAR {
                    out[pos as usize] = true;
                }
            }
        }
    }
}

fn apply_density_burst(
    learned: &LearnedPattern,
    out: &mut [bool; MAX_TICKS_PER_BAR],
    fuel: u8,
    prng: &mut Xorshift32,
    ppqn: u16,
    ticks_per_bar: u16,
) {
    if ppqn == 0 {
        return;
    }
    let mut beat_start = 0u16;
    while beat_start < ticks_per_bar {
        if learned.hits[beat_start as usize] && should_apply_injection(fuel, 100, prng) {
            let sub = beat_start + ppqn / 2;
            if (sub as usize) < MAX_TICKS_PER_BAR && sub < ticks_per_bar {
                out[sub as usize] = true;
            }
        }
        beat_start += ppqn;
    }
}

fn apply_permutation(out: &mut [bool; MAX_TICKS_PER_BAR], ppqn: u16, ticks_per_bar: u16, prng: &mut Xorshift32) {
    let segment = ppqn / 2;
    if segment == 0 {
        return;
    }
    let segment_count = (ticks_per_bar / segment) as usize;
    if segment_count < 2 {
        return;
    }
    let mut perm: Vec<usize> = (0..segment_count).collect();
    for i in (1..segment_count).rev() {
        let j = prng.next_range((i + 1) as u32) as usize;
        perm.swap(i, j);
    }
    let mut scratch = [false; MAX_TICKS_PER_BAR];
    for (dst_seg, &src_seg) in perm.iter().enumerate() {
        let src_start = src_seg * segment as usize;
        let dst_start = dst_seg * segment as usize;
        for o in 0..segment as usize {
            scratch[dst_start + o] = out[src_start + o];
        }
    }
    *out = scratch;
}

fn apply_polyrhythm(out: &mut [bool; MAX_TICKS_PER_BAR], _ppqn: u16, ticks_per_bar: u16, prng: &mut Xorshift32) {
    let poly_type: u16 = if prng.next_range(2) == 0 { 3 } else { 5 };
    let spacing = ticks_per_bar / poly_type;
    if spacing == 0 {
        return;
    }
    for k in 0..poly_type {
        let pos = (k * spacing) as usize;
        if pos < MAX_TICKS_PER_BAR {
            out[pos] = true;
        }
    }
}

/// Per-sample automation inputs for [`TriggerInjector::process_block`].
pub struct TriggerInjectorParams<'a> {
    pub fuel: &'a [Sample],
    pub ppqn: &'a [Sample],
    pub bar_length: &'a [Sample],
    pub injection_interval: &'a [Sample],
    pub learning_bars: &'a [Sample],
    pub prob_microtiming: &'a [Sample],
    pub prob_omission: &'a [Sample],
    pub prob_roll: &'a [Sample],
    pub prob_density: &'a [Sample],
    pub prob_permutation: &'a [Sample],
    pub prob_polyrhythm: &'a [Sample],
    /// Per-channel mix discipline; 0 = Replace, nonzero = Add. Read once per block.
    pub trig_out_mode: [&'a [Sample]; MAX_CHANNELS],
    /// 0 = CV, nonzero = MIDI. Informational only (see [`ClockSource`]).
    pub clock_source: &'a [Sample],
}

/// Gate/trigger inputs. `None` means the bus is disconnected and reads as 0.
pub struct TriggerInjectorInputs<'a> {
    pub clock: Option<&'a [Sample]>,
    pub reset: Option<&'a [Sample]>,
    pub trigger_in: [Option<&'a [Sample]>; MAX_CHANNELS],
}

pub struct TriggerInjectorOutputs<'a> {
    pub trigger_out: [&'a mut [Sample]; MAX_CHANNELS],
}

/// Learns the trigger pattern arriving on each channel and, once locked,
/// periodically replaces the passthrough with an injected variation of it.
pub struct TriggerInjector {
    sample_rate: f32,
    num_channels: usize,

    fuel: u8,
    ppqn: u16,
    bar_length: u16,
    ticks_per_bar: u16,
    injection_interval: u16,
    required_stable_bars: u16,
    probabilities: [u8; 6],
    clock_source: ClockSource,
    trig_out_mode: [TrigOutMode; MAX_CHANNELS],
    trig_in_bus: [i32; MAX_CHANNELS],
    trig_out_bus: [i32; MAX_CHANNELS],

    clock_tick_counter: u16,
    bar_counter: u32,
    samples_since_last_clock: u32,
    last_clock_period_samples: u32,
    prev_clock_level: f32,
    prev_reset_level: f32,
    prev_trigger_level: [f32; MAX_CHANNELS],
    trigger_active_samples_remaining: [u32; MAX_CHANNELS],
    current_bar_index: u8,
    is_injection_bar: bool,
    stable_bars_count: u16,
    bars_since_lock: u32,
    prng: Xorshift32,
    state: SupervisorState,

    recorders: [ChannelRecorder; MAX_CHANNELS],
    learned: [LearnedPattern; MAX_CHANNELS],
    output_bar: [[bool; MAX_TICKS_PER_BAR]; MAX_CHANNELS],
}

impl TriggerInjector {
    pub fn new(sample_rate: f32, num_channels: usize) -> Self {
        let ppqn = 48;
        let bar_length = 4;
        Self {
            sample_rate: sample_rate.max(1.0),
            num_channels: num_channels.clamp(1, MAX_CHANNELS),
            fuel: 100,
            ppqn,
            bar_length,
            ticks_per_bar: ppqn * bar_length,
            injection_interval: 4,
            required_stable_bars: 1,
            probabilities: [50, 30, 40, 35, 25, 20],
            clock_source: ClockSource::Cv,
            trig_out_mode: [TrigOutMode::Replace; MAX_CHANNELS],
            trig_in_bus: std::array::from_fn(|c| (c + 1) as i32),
            trig_out_bus: std::array::from_fn(|c| (c + 1) as i32),
            clock_tick_counter: 0,
            bar_counter: 0,
            samples_since_last_clock: 0,
            last_clock_period_samples: 0,
            prev_clock_level: 0.0,
            prev_reset_level: 0.0,
            prev_trigger_level: [0.0; MAX_CHANNELS],
            trigger_active_samples_remaining: [0; MAX_CHANNELS],
            current_bar_index: 0,
            is_injection_bar: false,
            stable_bars_count: 0,
            bars_since_lock: 0,
            prng: Xorshift32::new(12345),
            state: SupervisorState::Learning,
            recorders: std::array::from_fn(|_| ChannelRecorder::new()),
            learned: std::array::from_fn(|_| LearnedPattern::empty()),
            output_bar: [[false; MAX_TICKS_PER_BAR]; MAX_CHANNELS],
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate.max(1.0);
    }

    pub fn set_num_channels(&mut self, channels: usize) {
        self.num_channels = channels.clamp(1, MAX_CHANNELS);
    }

    pub fn set_clock_source(&mut self, source: ClockSource) {
        self.clock_source = source;
    }

    pub fn set_trig_out_mode(&mut self, channel: usize, mode: TrigOutMode) {
        if channel < MAX_CHANNELS {
            self.trig_out_mode[channel] = mode;
        }
    }

    pub fn set_channel_routing(&mut self, channel: usize, trig_in_bus: i32, trig_out_bus: i32) {
        if channel < MAX_CHANNELS {
            self.trig_in_bus[channel] = trig_in_bus;
            self.trig_out_bus[channel] = trig_out_bus;
        }
    }

    /// Forces a full re-learn: clears the supervisor, both pattern buffers,
    /// learned snapshots, pulse timers and counters. Equivalent to a reset edge.
    pub fn reset(&mut self) {
        self.full_reinit();
    }

    pub fn supervisor_state(&self) -> SupervisorState {
        self.state
    }

    pub fn state_name(&self) -> &'static str {
        match self.state {
            SupervisorState::Learning => "LEARN",
            SupervisorState::Locked => "LOCK",
            SupervisorState::Injecting => "INJ",
        }
    }

    pub fn bar_counter(&self) -> u32 {
        self.bar_counter
    }

    pub fn current_tick(&self) -> u16 {
        self.clock_tick_counter
    }

    pub fn ticks_per_bar(&self) -> u16 {
        self.ticks_per_bar
    }

    pub fn is_injection_bar(&self) -> bool {
        self.is_injection_bar
    }

    pub fn learned_hit_count(&self, channel: usize) -> u16 {
        self.learned.get(channel).map_or(0, |p| p.hit_count)
    }

    pub fn last_clock_period_samples(&self) -> u32 {
        self.last_clock_period_samples
    }

    pub fn pulse_remaining_samples(&self, channel: usize) -> u32 {
        self.trigger_active_samples_remaining.get(channel).copied().unwrap_or(0)
    }

    fn full_reinit(&mut self) {
        self.state = SupervisorState::Learning;
        self.stable_bars_count = 0;
        self.bars_since_lock = 0;
        self.is_injection_bar = false;
        self.clock_tick_counter = 0;
        self.bar_counter = 0;
        self.samples_since_last_clock = 0;
        self.current_bar_index = 0;
        for c in 0..MAX_CHANNELS {
            self.recorders[c].clear();
            self.learned[c] = LearnedPattern::empty();
            self.output_bar[c] = [false; MAX_TICKS_PER_BAR];
            self.trigger_active_samples_remaining[c] = 0;
        }
    }

    /// Drops back to Learning on detected pattern drift. The stale learned
    /// snapshot is left in place; it will be overwritten the next time a
    /// fresh pattern locks.
    fn soft_relearn(&mut self) {
        self.state = SupervisorState::Learning;
        self.stable_bars_count = 0;
        self.bars_since_lock = 0;
        self.is_injection_bar = false;
        for c in 0..MAX_CHANNELS {
            self.trigger_active_samples_remaining[c] = 0;
        }
    }

    fn on_bar_boundary(&mut self) {
        match self.state {
            SupervisorState::Learning => {
                let mut min_similarity = 100.0f32;
                for c in 0..self.num_channels {
                    let s = self.recorders[c].similarity();
                    if s < min_similarity {
                        min_similarity = s;
                    }
                }
                if min_similarity >= SIMILARITY_THRESHOLD {
                    self.stable_bars_count += 1;
                    if self.stable_bars_count >= self.required_stable_bars {
                        self.state = SupervisorState::Locked;
                        for c in 0..self.num_channels {
                            self.learned[c] = LearnedPattern::snapshot_from(&self.recorders[c]);
                        }
                        self.bars_since_lock = 0;
                    }
                } else {
                    self.stable_bars_count = 0;
                }
            }
            SupervisorState::Locked | SupervisorState::Injecting => {
                let changed = (0..self.num_channels)
                    .any(|c| self.learned[c].differs_from(&self.recorders[c].hit_bar1));
                if changed {
                    self.soft_relearn();
                } else {
                    self.bars_since_lock += 1;
                    if self.state == SupervisorState::Injecting {
                        self.state = SupervisorState::Locked;
                        self.is_injection_bar = false;
                        for c in 0..MAX_CHANNELS {
                            self.trigger_active_samples_remaining[c] = 0;
                        }
                    }
                    if self.state == SupervisorState::Locked
                        && self.fuel > 0
                        && should_inject_this_bar(self.bar_counter, self.injection_interval)
                    {
                        self.state = SupervisorState::Injecting;
                        self.is_injection_bar = true;
                        self.populate_injection_bars();
                    }
                }
            }
        }
        for c in 0..MAX_CHANNELS {
            self.recorders[c].rotate();
        }
    }

    fn populate_injection_bars(&mut self) {
        for c in 0..self.num_channels {
            let mut out = [false; MAX_TICKS_PER_BAR];
            out[..self.ticks_per_bar as usize]
                .copy_from_slice(&self.learned[c].hits[..self.ticks_per_bar as usize]);

            if should_apply_injection(self.fuel, self.probabilities[0], &mut self.prng) {
                apply_microtiming(&mut out, self.ticks_per_bar, self.ppqn, &mut self.prng);
            }
            if should_apply_injection(self.fuel, self.probabilities[1], &mut self.prng) {
                apply_omission(&self.learned[c], &mut out, self.fuel, &mut self.prng, self.ticks_per_bar);
            }
            if should_apply_injection(self.fuel, self.probabilities[2], &mut self.prng) {
                apply_roll(&self.learned[c], &mut out, self.fuel, &mut self.prng, self.ppqn, self.ticks_per_bar);
            }
            if should_apply_injection(self.fuel, self.probabilities[3], &mut self.prng) {
                apply_density_burst(&self.learned[c], &mut out, self.fuel, &mut self.prng, self.ppqn, self.ticks_per_bar);
            }
            if should_apply_injection(self.fuel, self.probabilities[4], &mut self.prng) {
                apply_permutation(&mut out, self.ppqn, self.ticks_per_bar, &mut self.prng);
            }
            if should_apply_injection(self.fuel, self.probabilities[5], &mut self.prng) {
                apply_polyrhythm(&mut out, self.ppqn, self.ticks_per_bar, &mut self.prng);
            }
            self.output_bar[c] = out;
        }
    }

    pub fn process_block(
        &mut self,
        outputs: &mut TriggerInjectorOutputs,
        inputs: &TriggerInjectorInputs,
        params: &TriggerInjectorParams,
    ) {
        let frames = outputs.trigger_out[0].len();
        if frames == 0 {
            return;
        }

        let fuel = sample_at(params.fuel, 0, 100.0).clamp(0.0, 100.0) as u8;
        let ppqn = clamp_ppqn(sample_at(params.ppqn, 0, 48.0));
        let mut bar_length = sample_at(params.bar_length, 0, 4.0).round().clamp(1.0, 8.0) as u16;
        let max_bar_length = (MAX_TICKS_PER_BAR as u16 / ppqn.max(1)).max(1);
        bar_length = bar_length.min(max_bar_length);
        let injection_interval = sample_at(params.injection_interval, 0, 4.0).round().clamp(1.0, 16.0) as u16;
        let learning_bars = sample_at(params.learning_bars, 0, 2.0).round().clamp(1.0, 8.0) as u16;
        let required_stable_bars = learning_bars.saturating_sub(1).max(1);
        let probabilities = [
            sample_at(params.prob_microtiming, 0, 50.0).clamp(0.0, 100.0) as u8,
            sample_at(params.prob_omission, 0, 30.0).clamp(0.0, 100.0) as u8,
            sample_at(params.prob_roll, 0, 40.0).clamp(0.0, 100.0) as u8,
            sample_at(params.prob_density, 0, 35.0).clamp(0.0, 100.0) as u8,
            sample_at(params.prob_permutation, 0, 25.0).clamp(0.0, 100.0) as u8,
            sample_at(params.prob_polyrhythm, 0, 20.0).clamp(0.0, 100.0) as u8,
        ];

        if ppqn != self.ppqn || bar_length != self.bar_length {
            self.ppqn = ppqn;
            self.bar_length = bar_length;
            self.ticks_per_bar = ppqn * bar_length;
            self.full_reinit();
        }
        self.fuel = fuel;
        self.injection_interval = injection_interval;
        self.required_stable_bars = required_stable_bars;
        self.probabilities = probabilities;
        self.clock_source = if sample_at(params.clock_source, 0, 0.0) >= 0.5 {
            ClockSource::Midi
        } else {
            ClockSource::Cv
        };
        for c in 0..MAX_CHANNELS {
            self.trig_out_mode[c] = if sample_at(params.trig_out_mode[c], 0, 0.0) >= 0.5 {
                TrigOutMode::Add
            } else {
                TrigOutMode::Replace
            };
        }

        let clock_connected = inputs.clock.is_some();

        for i in 0..frames {
            let clock_level = input_at(inputs.clock, i);
            let reset_level = input_at(inputs.reset, i);

            self.samples_since_last_clock += 1;

            let clock_edge = is_rising_edge(clock_level, self.prev_clock_level);
            let reset_edge = is_rising_edge(reset_level, self.prev_reset_level);
            self.prev_clock_level = clock_level;
            self.prev_reset_level = reset_level;

            if reset_edge {
                self.full_reinit();
            } else if clock_edge {
                self.last_clock_period_samples = self.samples_since_last_clock;
                self.samples_since_last_clock = 0;
            }

            let current_tick = self.clock_tick_counter;

            for c in 0..MAX_CHANNELS {
                let trig_level = input_at(inputs.trigger_in[c], i);
                let trig_edge = is_rising_edge(trig_level, self.prev_trigger_level[c]);
                self.prev_trigger_level[c] = trig_level;

                let channel_active = c < self.num_channels;
                if trig_edge && channel_active {
                    self.recorders[c].record_hit(current_tick as usize);
                }

                let pass_through = !channel_active
                    || self.state == SupervisorState::Learning
                    || self.fuel == 0
                    || !clock_connected;

                let sample_value = if pass_through {
                    trig_level
                } else {
                    if clock_edge {
                        let hit = if self.state == SupervisorState::Injecting {
                            self.output_bar[c][current_tick as usize]
                        } else {
                            self.learned[c].hits[current_tick as usize]
                        };
                        if hit {
                            let pulse_len = pulse_length_samples(self.sample_rate);
                            let half_period = (self.last_clock_period_samples / 2).max(1);
                            self.trigger_active_samples_remaining[c] = pulse_len.min(half_period);
                        }
                    }
                    if self.trigger_active_samples_remaining[c] > 0 {
                        TRIGGER_HIGH
                    } else {
                        0.0
                    }
                };

                if self.trigger_active_samples_remaining[c] > 0 {
                    self.trigger_active_samples_remaining[c] -= 1;
                }

                match self.trig_out_mode[c] {
                    TrigOutMode::Replace => outputs.trigger_out[c][i] = sample_value,
                    TrigOutMode::Add => {
                        if pass_through && self.trig_out_bus[c] == self.trig_in_bus[c] {
                            outputs.trigger_out[c][i] = sample_value;
                        } else {
                            outputs.trigger_out[c][i] += sample_value;
                        }
                    }
                }
            }

            if clock_edge && !reset_edge {
                self.clock_tick_counter += 1;
                if self.clock_tick_counter >= self.ticks_per_bar {
                    self.clock_tick_counter = 0;
                    self.bar_counter += 1;
                    self.current_bar_index ^= 1;
                    self.on_bar_boundary();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn injector_with_channels(n: usize) -> TriggerInjector {
        TriggerInjector::new(48000.0, n)
    }

    fn run_block(
        inj: &mut TriggerInjector,
        clock: &[Sample],
        reset: Option<&[Sample]>,
        trig: [Option<&[Sample]>; MAX_CHANNELS],
        params: &TriggerInjectorParams,
    ) -> Vec<[Sample; MAX_CHANNELS]> {
        let frames = clock.len();
        let mut bufs: Vec<Vec<Sample>> = (0..MAX_CHANNELS).map(|_| vec![0.0; frames]).collect();
        {
            let slices: [&mut [Sample]; MAX_CHANNELS] = bufs
                .iter_mut()
                .map(|v| v.as_mut_slice())
                .collect::<Vec<_>>()
                .try_into()
                .unwrap_or_else(|_| panic!("expected {MAX_CHANNELS} channel buffers"));
            let mut outputs = TriggerInjectorOutputs { trigger_out: slices };
            let inputs = TriggerInjectorInputs { clock: Some(clock), reset, trigger_in: trig };
            inj.process_block(&mut outputs, &inputs, params);
        }
        (0..frames)
            .map(|i| std::array::from_fn(|c| bufs[c][i]))
            .collect()
    }

    fn default_params() -> TriggerInjectorParams<'static> {
        TriggerInjectorParams {
            fuel: &[100.0],
            ppqn: &[48.0],
            bar_length: &[4.0],
            injection_interval: &[4.0],
            learning_bars: &[2.0],
            prob_microtiming: &[50.0],
            prob_omission: &[30.0],
            prob_roll: &[40.0],
            prob_density: &[35.0],
            prob_permutation: &[25.0],
            prob_polyrhythm: &[20.0],
            trig_out_mode: [&[0.0]; MAX_CHANNELS],
            clock_source: &[0.0],
        }
    }

    fn clock_pulses(frames: usize, period: usize) -> Vec<Sample> {
        let mut out = vec![0.0; frames];
        let mut i = 0;
        while i < frames {
            out[i] = 5.0;
            i += period;
        }
        out
    }

    // --- primitives ---

    #[test]
    fn rising_edge_detects_threshold_crossing() {
        assert!(is_rising_edge(5.0, 0.0));
        assert!(!is_rising_edge(5.0, 5.0));
        assert!(!is_rising_edge(0.0, 5.0));
        assert!(is_rising_edge(1.0, 0.999));
    }

    #[test]
    fn xorshift32_is_deterministic_given_seed() {
        let mut a = Xorshift32::new(12345);
        let mut b = Xorshift32::new(12345);
        for _ in 0..10 {
            assert_eq!(a.next(), b.next());
        }
    }

    #[test]
    fn xorshift32_produces_varied_values() {
        let mut rng = Xorshift32::new(12345);
        let v1 = rng.next();
        let v2 = rng.next();
        let v3 = rng.next();
        assert_ne!(v1, v2);
        assert_ne!(v2, v3);
    }

    #[test]
    fn bar_position_and_number_wrap_correctly() {
        assert_eq!(bar_position(0, 48, 4), 0);
        assert_eq!(bar_position(191, 48, 4), 191);
        assert_eq!(bar_position(192, 48, 4), 0);
        assert_eq!(bar_number(191, 48, 4), 0);
        assert_eq!(bar_number(192, 48, 4), 1);
    }

    #[test]
    fn recorder_similarity_empty_bars_is_100() {
        let rec = ChannelRecorder::new();
        assert_eq!(rec.similarity(), 100.0);
    }

    #[test]
    fn recorder_similarity_identical_bars_is_100() {
        let mut rec = ChannelRecorder::new();
        rec.record_hit(0);
        rec.record_hit(10);
        rec.rotate();
        rec.record_hit(0);
        rec.record_hit(10);
        assert_eq!(rec.similarity(), 100.0);
    }

    #[test]
    fn recorder_similarity_disjoint_bars_is_0() {
        let mut rec = ChannelRecorder::new();
        rec.record_hit(0);
        rec.rotate();
        rec.record_hit(10);
        assert_eq!(rec.similarity(), 0.0);
    }

    #[test]
    fn record_hit_is_idempotent() {
        let mut rec = ChannelRecorder::new();
        rec.record_hit(5);
        rec.record_hit(5);
        rec.record_hit(5);
        assert_eq!(rec.hit_count_bar1, 1);
    }

    #[test]
    fn rotation_moves_completed_bar_into_bar2_and_resets_bar1() {
        let mut rec = ChannelRecorder::new();
        rec.record_hit(3);
        rec.rotate();
        rec.record_hit(7);
        rec.rotate();
        assert!(rec.hit_bar2[7]);
        assert!(!rec.hit_bar2[3]);
        assert_eq!(rec.hit_count_bar1, 0);
    }

    #[test]
    fn should_apply_injection_never_fires_at_zero_fuel_or_probability() {
        let mut rng = Xorshift32::new(99);
        for _ in 0..200 {
            assert!(!should_apply_injection(0, 80, &mut rng));
            assert!(!should_apply_injection(80, 0, &mut rng));
        }
    }

    #[test]
    fn should_inject_this_bar_matches_interval() {
        assert!(should_inject_this_bar(4, 4));
        assert!(should_inject_this_bar(8, 4));
        assert!(!should_inject_this_bar(9, 4));
        assert!(!should_inject_this_bar(5, 4));
    }

    // --- injection kernels ---

    #[test]
    fn microtiming_shift_avoids_landing_on_adjacent_hit() {
        assert_eq!(apply_microtiming_shift(10, 2, None), 12);
        assert_eq!(apply_microtiming_shift(10, 2, Some(12)), 13);
        assert_eq!(apply_microtiming_shift(10, -2, Some(8)), 7);
    }

    #[test]
    fn microtiming_shift_clamps_to_bar_bounds() {
        assert_eq!(apply_microtiming_shift(0, -5, None), 0);
        assert_eq!(apply_microtiming_shift(MAX_TICKS_PER_BAR as i32 - 1, 5, None), MAX_TICKS_PER_BAR as i32 - 1);
    }

    #[test]
    fn omission_never_removes_more_than_quarter_of_hits() {
        let mut learned = LearnedPattern::empty();
        for &t in &[0usize, 12, 24, 36, 48, 60, 72, 84] {
            learned.hits[t] = true;
            learned.hit_count += 1;
        }
        let mut out = learned.hits;
        let mut rng = Xorshift32::new(42);
        apply_omission(&learned, &mut out, 100, &mut rng, 192);
        let remaining = out.iter().filter(|&&b| b).count();
        assert!(remaining >= 6, "omission should not remove more than 2 of 8 hits, kept {remaining}");
        assert!(out[0], "downbeat should be preferred to survive when alternatives exist");
    }

    #[test]
    fn roll_adds_subdivisions_within_the_same_beat() {
        let mut learned = LearnedPattern::empty();
        learned.hits[0] = true;
        learned.hit_count = 1;
        let mut out = learned.hits;
        let mut rng = Xorshift32::new(7);
        apply_roll(&learned, &mut out, 100, &mut rng, 48, 192);
        let added: Vec<usize> = (1..48).filter(|&i| out[i]).collect();
        assert!(!added.is_empty());
        for pos in added {
            assert!(pos < 48, "roll subdivisions must stay within the originating beat");
        }
    }

    #[test]
    fn density_burst_adds_eighth_after_hit_beats_only() {
        let mut learned = LearnedPattern::empty();
        learned.hits[0] = true;
        learned.hit_count = 1;
        let mut out = learned.hits;
        let mut rng = Xorshift32::new(3);
        apply_density_burst(&learned, &mut out, 100, &mut rng, 48, 192);
        assert!(out[0]);
        assert!(!out[48], "beat without a learned hit must not gain a burst");
    }

    #[test]
    fn permutation_preserves_total_hit_count() {
        let mut out = [false; MAX_TICKS_PER_BAR];
        out[0] = true;
        out[30] = true;
        out[100] = true;
        let before = out.iter().filter(|&&b| b).count();
        let mut rng = Xorshift32::new(55);
        apply_permutation(&mut out, 48, 192, &mut rng);
        let after = out.iter().filter(|&&b| b).count();
        assert_eq!(before, after);
    }

    #[test]
    fn polyrhythm_places_three_or_five_evenly_spaced_hits() {
        let mut out = [false; MAX_TICKS_PER_BAR];
        let mut rng = Xorshift32::new(1);
        apply_polyrhythm(&mut out, 48, 192, &mut rng);
        let count = out.iter().filter(|&&b| b).count();
        assert!(count == 3 || count == 5);
    }

    // --- end to end scenarios ---

    #[test]
    fn pass_through_during_learning_is_sample_exact() {
        let mut inj = injector_with_channels(1);
        let params = default_params();
        let clock = clock_pulses(400, 50);
        let mut trig = vec![0.0; 400];
        trig[10] = 5.0;
        trig[210] = 5.0;
        let trig_opts: [Option<&[Sample]>; MAX_CHANNELS] =
            std::array::from_fn(|c| if c == 0 { Some(trig.as_slice()) } else { None });
        let out = run_block(&mut inj, &clock, None, trig_opts, &params);
        for i in 0..400 {
            assert_eq!(out[i][0], trig[i]);
        }
        assert_eq!(inj.supervisor_state(), SupervisorState::Learning);
    }

    #[test]
    fn identical_bars_lock_after_required_stable_count() {
        let mut inj = injector_with_channels(1);
        let mut params = default_params();
        params.learning_bars = &[2.0];
        let ppqn = 48u16;
        let bar_length = 4u16;
        let ticks_per_bar = (ppqn * bar_length) as usize;
        let clock_period = 20usize;
        let frames_per_bar = ticks_per_bar * clock_period;

        let mut trig = vec![0.0; frames_per_bar];
        trig[0] = 5.0;
        trig[clock_period * 24] = 5.0;
        let clock = clock_pulses(frames_per_bar, clock_period);

        for _ in 0..3 {
            let trig_opts: [Option<&[Sample]>; MAX_CHANNELS] =
                std::array::from_fn(|c| if c == 0 { Some(trig.as_slice()) } else { None });
            run_block(&mut inj, &clock, None, trig_opts, &params);
        }

        assert_eq!(inj.supervisor_state(), SupervisorState::Locked);
        assert_eq!(inj.learned_hit_count(0), 2);
    }

    #[test]
    fn reset_mid_bar_forces_relearn_and_silences_output() {
        let mut inj = injector_with_channels(1);
        let params = default_params();
        let ppqn = 48u16;
        let bar_length = 4u16;
        let clock_period = 20usize;
        let frames_per_bar = (ppqn * bar_length) as usize * clock_period;

        let mut trig = vec![0.0; frames_per_bar];
        trig[0] = 5.0;
        let clock = clock_pulses(frames_per_bar, clock_period);
        for _ in 0..3 {
            let trig_opts: [Option<&[Sample]>; MAX_CHANNELS] =
                std::array::from_fn(|c| if c == 0 { Some(trig.as_slice()) } else { None });
            run_block(&mut inj, &clock, None, trig_opts, &params);
        }
        assert_eq!(inj.supervisor_state(), SupervisorState::Locked);

        let half_bar = frames_per_bar / 2;
        let clock_half = clock_pulses(half_bar, clock_period);
        let silent_trig = vec![0.0; half_bar];
        let mut reset = vec![0.0; half_bar];
        reset[10] = 5.0;
        let trig_opts: [Option<&[Sample]>; MAX_CHANNELS] =
            std::array::from_fn(|c| if c == 0 { Some(silent_trig.as_slice()) } else { None });
        run_block(&mut inj, &clock_half, Some(&reset), trig_opts, &params);

        assert_eq!(inj.supervisor_state(), SupervisorState::Learning);
        assert_eq!(inj.bar_counter(), 0);
        assert_eq!(inj.current_tick(), 0);
    }

    #[test]
    fn injection_schedule_flips_state_on_interval_and_reverts_next_bar() {
        let mut inj = injector_with_channels(1);
        let mut params = default_params();
        params.learning_bars = &[2.0];
        params.injection_interval = &[4.0];
        let ppqn = 48u16;
        let bar_length = 4u16;
        let clock_period = 4usize;
        let frames_per_bar = (ppqn * bar_length) as usize * clock_period;

        let mut trig = vec![0.0; frames_per_bar];
        trig[0] = 5.0;
        let clock = clock_pulses(frames_per_bar, clock_period);

        // bars 0,1,2,3: two learning bars then two stable locked bars.
        for _ in 0..4 {
            let trig_opts: [Option<&[Sample]>; MAX_CHANNELS] =
                std::array::from_fn(|c| if c == 0 { Some(trig.as_slice()) } else { None });
            run_block(&mut inj, &clock, None, trig_opts, &params);
        }
        assert_eq!(inj.supervisor_state(), SupervisorState::Locked);
        assert_eq!(inj.bar_counter(), 4);

        // bar 3->4 boundary: bar_counter becomes 4, 4 % 4 == 0, should inject.
        let trig_opts: [Option<&[Sample]>; MAX_CHANNELS] =
            std::array::from_fn(|c| if c == 0 { Some(trig.as_slice()) } else { None });
        run_block(&mut inj, &clock, None, trig_opts, &params);
        assert_eq!(inj.supervisor_state(), SupervisorState::Injecting);
        assert_eq!(inj.bar_counter(), 5);

        // bar 4->5 boundary: pattern still matches (we keep feeding the
        // learned hit) so it must revert to Locked, not stay Injecting forever.
        let trig_opts: [Option<&[Sample]>; MAX_CHANNELS] =
            std::array::from_fn(|c| if c == 0 { Some(trig.as_slice()) } else { None });
        run_block(&mut inj, &clock, None, trig_opts, &params);
        assert_eq!(inj.supervisor_state(), SupervisorState::Locked);
    }

    #[test]
    fn pulse_width_never_exceeds_half_the_clock_period() {
        let mut inj = injector_with_channels(1);
        let mut params = default_params();
        params.learning_bars = &[2.0];
        let ppqn = 48u16;
        let bar_length = 4u16;
        let clock_period = 3usize;
        let frames_per_bar = (ppqn * bar_length) as usize * clock_period;

        let mut trig = vec![0.0; frames_per_bar];
        trig[0] = 5.0;
        let clock = clock_pulses(frames_per_bar, clock_period);
        for _ in 0..3 {
            let trig_opts: [Option<&[Sample]>; MAX_CHANNELS] =
                std::array::from_fn(|c| if c == 0 { Some(trig.as_slice()) } else { None });
            run_block(&mut inj, &clock, None, trig_opts, &params);
        }
        assert_eq!(inj.supervisor_state(), SupervisorState::Locked);
        assert!(inj.pulse_remaining_samples(0) <= (clock_period / 2).max(1) as u32);
    }

    #[test]
    fn structural_ppqn_change_forces_full_reinit() {
        let mut inj = injector_with_channels(1);
        let mut params = default_params();
        params.learning_bars = &[2.0];
        let clock_period = 20usize;
        let frames_per_bar = 192 * clock_period;
        let mut trig = vec![0.0; frames_per_bar];
        trig[0] = 5.0;
        let clock = clock_pulses(frames_per_bar, clock_period);
        for _ in 0..3 {
            let trig_opts: [Option<&[Sample]>; MAX_CHANNELS] =
                std::array::from_fn(|c| if c == 0 { Some(trig.as_slice()) } else { None });
            run_block(&mut inj, &clock, None, trig_opts, &params);
        }
        assert_eq!(inj.supervisor_state(), SupervisorState::Locked);

        params.ppqn = &[24.0];
        let trig_opts: [Option<&[Sample]>; MAX_CHANNELS] =
            std::array::from_fn(|c| if c == 0 { Some(trig.as_slice()) } else { None });
        run_block(&mut inj, &clock[..10], None, trig_opts, &params);
        assert_eq!(inj.supervisor_state(), SupervisorState::Learning);
    }

    #[test]
    fn disabled_channel_always_passes_through() {
        let mut inj = injector_with_channels(1);
        let params = default_params();
        let clock = clock_pulses(100, 20);
        let mut trig1 = vec![0.0; 100];
        trig1[5] = 5.0;
        let trig_opts: [Option<&[Sample]>; MAX_CHANNELS] = std::array::from_fn(|c| {
            if c == 1 {
                Some(trig1.as_slice())
            } else {
                None
            }
        });
        let out = run_block(&mut inj, &clock, None, trig_opts, &params);
        assert_eq!(out[5][1], 5.0);
    }
}
