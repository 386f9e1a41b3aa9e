use std::collections::VecDeque;

use danmaku_protocol::CommentId;
use log::warn;

use crate::kinematics::{distance_covered, leading_edge, velocity};
use crate::stacking::Placement;

/// An admitted comment in flight along its lane.
#[derive(Debug, Clone)]
pub struct Banner<H> {
    pub id: CommentId,
    /// Renderer-owned visual handle.
    pub handle: H,
    /// Footprint along the travel axis.
    pub width: f64,
    /// Playback-clock time of admission.
    pub inserted_at: f64,
    /// Crossing time in effect at admission.
    pub duration: f64,
    pub placement: Placement,
}

impl<H> Banner<H> {
    /// Whether a candidate of `candidate_width` inserted at `now` stays
    /// behind this banner for the whole crossing.
    ///
    /// Both distances are measured with this banner's velocity: first it
    /// must have pulled its full width clear of the entry edge, then it
    /// must still be ahead by the time the candidate would reach the far
    /// edge.
    pub fn clears(&self, candidate_width: f64, container_width: f64, speed: f64, now: f64) -> bool {
        let v_self = velocity(container_width, self.width, speed);

        let t1 = now - self.inserted_at;
        let d1 = distance_covered(v_self, t1);
        if d1 < self.width {
            return false;
        }

        let v_candidate = velocity(container_width, candidate_width, speed);
        let t2 = t1 + container_width / v_candidate;
        let d2 = distance_covered(v_self, t2);
        if d2 < container_width + self.width {
            return false;
        }

        true
    }

    /// Leading-edge x position at playback time `now`.
    pub fn position(&self, container_width: f64, now: f64) -> f64 {
        let v = velocity(container_width, self.width, self.duration);
        leading_edge(now, self.inserted_at, container_width, v)
    }

    /// Playback time at which the banner finishes crossing.
    pub fn finishes_at(&self) -> f64 {
        self.inserted_at + self.duration
    }
}

/// Growable set of lanes, each a FIFO of banners in insertion order.
///
/// Lanes are created on first use and never removed; an empty lane
/// accepts any candidate.
#[derive(Debug, Clone)]
pub struct LaneAllocator<H> {
    lanes: Vec<VecDeque<Banner<H>>>,
}

impl<H> LaneAllocator<H> {
    pub fn new() -> Self {
        Self { lanes: Vec::new() }
    }

    /// First lane whose newest banner is cleared by the candidate, or the
    /// index of a brand-new lane when none is.
    ///
    /// Only the lane tail is tested: every earlier banner in the lane is
    /// further along and clears whatever the tail clears.
    pub fn find_lane(&self, candidate_width: f64, container_width: f64, speed: f64, now: f64) -> usize {
        self.lanes
            .iter()
            .position(|lane| {
                lane.back()
                    .is_none_or(|tail| tail.clears(candidate_width, container_width, speed, now))
            })
            .unwrap_or(self.lanes.len())
    }

    /// Append a banner to the tail of `lane`, creating lanes up to it.
    pub fn push(&mut self, lane: usize, banner: Banner<H>) {
        if self.lanes.len() <= lane {
            self.lanes.resize_with(lane + 1, VecDeque::new);
        }
        self.lanes[lane].push_back(banner);
    }

    /// Remove banner `id` from `lane`.
    ///
    /// Banners finish in insertion order, so this is normally the lane
    /// head. If the crossing time changed while banners were in flight
    /// the order can break; the banner is then taken from wherever it is.
    pub fn retire(&mut self, lane: usize, id: CommentId) -> Option<Banner<H>> {
        let queue = self.lanes.get_mut(lane)?;
        if queue.front().is_some_and(|head| head.id == id) {
            return queue.pop_front();
        }
        let index = queue.iter().position(|banner| banner.id == id)?;
        warn!("retiring {id} from position {index} of lane {lane}, not its head");
        queue.remove(index)
    }

    /// Empty every lane, returning the banners that were in flight.
    pub fn clear(&mut self) -> Vec<Banner<H>> {
        let banners = self.lanes.iter_mut().flat_map(|lane| lane.drain(..)).collect();
        self.lanes.clear();
        banners
    }

    /// Number of lanes ever used since the last clear.
    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    pub fn lane(&self, index: usize) -> Option<&VecDeque<Banner<H>>> {
        self.lanes.get(index)
    }

    /// Every banner in flight, lane by lane.
    pub fn banners(&self) -> impl Iterator<Item = &Banner<H>> {
        self.lanes.iter().flatten()
    }

    /// Number of banners in flight.
    pub fn len(&self) -> usize {
        self.lanes.iter().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.iter().all(VecDeque::is_empty)
    }
}

impl<H> Default for LaneAllocator<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTAINER: f64 = 1000.0;
    const SPEED: f64 = 5.0;

    fn banner(id: u64, width: f64, inserted_at: f64) -> Banner<()> {
        Banner {
            id: CommentId(id),
            handle: (),
            width,
            inserted_at,
            duration: SPEED,
            placement: Placement::default(),
        }
    }

    #[test]
    fn empty_allocator_uses_lane_zero() {
        let lanes = LaneAllocator::<()>::new();
        assert_eq!(lanes.find_lane(100.0, CONTAINER, SPEED, 0.0), 0);
    }

    #[test]
    fn simultaneous_comments_take_new_lanes() {
        let mut lanes = LaneAllocator::new();
        for id in 0..3 {
            let lane = lanes.find_lane(100.0, CONTAINER, SPEED, 0.0);
            assert_eq!(lane, id as usize);
            lanes.push(lane, banner(id, 100.0, 0.0));
        }
        assert_eq!(lanes.lane_count(), 3);
    }

    #[test]
    fn tail_must_clear_entry_edge() {
        // v = 220/s, so a 100-wide banner clears the entry edge after 0.4545s.
        let tail = banner(0, 100.0, 0.0);
        assert!(!tail.clears(100.0, CONTAINER, SPEED, 0.4));
        assert!(tail.clears(100.0, CONTAINER, SPEED, 0.5));
    }

    #[test]
    fn faster_candidate_must_not_catch_up() {
        // A 100-wide tail is clear of the entry edge at t=0.5, but a
        // 900-wide candidate moves at 380/s and would reach the far edge
        // at t=0.5+2.63 while the tail still has 1100-220*3.13 to go.
        let tail = banner(0, 100.0, 0.0);
        assert!(!tail.clears(900.0, CONTAINER, SPEED, 0.5));
        // Narrow candidates are slower than the tail and never catch it.
        assert!(tail.clears(10.0, CONTAINER, SPEED, 0.5));
    }

    #[test]
    fn drained_lane_is_reused() {
        let mut lanes = LaneAllocator::new();
        lanes.push(0, banner(0, 100.0, 0.0));
        lanes.push(1, banner(1, 100.0, 0.0));
        assert!(lanes.retire(0, CommentId(0)).is_some());
        assert_eq!(lanes.find_lane(100.0, CONTAINER, SPEED, 0.1), 0);
        assert!(lanes.lane(0).is_some_and(VecDeque::is_empty));
    }

    #[test]
    fn retire_prefers_head_and_falls_back_to_search() {
        let mut lanes = LaneAllocator::new();
        lanes.push(0, banner(0, 100.0, 0.0));
        lanes.push(0, banner(1, 100.0, 3.0));
        lanes.push(0, banner(2, 100.0, 4.0));

        let out = lanes.retire(0, CommentId(1)).map(|b| b.id);
        assert_eq!(out, Some(CommentId(1)));
        let ids: Vec<_> = lanes.banners().map(|b| b.id.0).collect();
        assert_eq!(ids, vec![0, 2]);

        assert!(lanes.retire(0, CommentId(9)).is_none());
        assert!(lanes.retire(7, CommentId(0)).is_none());
    }

    #[test]
    fn clear_returns_in_flight_banners() {
        let mut lanes = LaneAllocator::new();
        lanes.push(0, banner(0, 100.0, 0.0));
        lanes.push(2, banner(1, 100.0, 0.0));
        assert_eq!(lanes.len(), 2);
        let cleared = lanes.clear();
        assert_eq!(cleared.len(), 2);
        assert!(lanes.is_empty());
        assert_eq!(lanes.lane_count(), 0);
    }

    #[test]
    fn position_tracks_leading_edge() {
        let b = banner(0, 100.0, 1.0);
        assert!((b.position(CONTAINER, 1.0) - 1000.0).abs() < 1e-9);
        assert!((b.position(CONTAINER, 6.0) + 100.0).abs() < 1e-9);
        assert!((b.finishes_at() - 6.0).abs() < f64::EPSILON);
    }
}
