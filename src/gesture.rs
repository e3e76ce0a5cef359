//! Open-hand gesture classification.
//!
//! The vision capability delivers 21 normalized hand joints per frame
//! (x and y in `0.0..=1.0`, y growing downward). A frame counts as an
//! "open hand raised" when:
//!
//! 1. each non-thumb fingertip sits above its knuckle (`tip.y < mcp.y`), and
//! 2. the vertical span between the middle fingertip and the wrist exceeds
//!    `min_hand_span`, rejecting distant or partially visible hands.
//!
//! Classification is stateless. Temporal persistence is the gesture
//! channel's cooldown, not the classifier's concern.

use std::path::PathBuf;

use heapless::Vec;
use serde::{Deserialize, Serialize};

/// Number of joints in a complete hand record.
pub const JOINT_COUNT: usize = 21;

/// Joint indices used by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum HandJoint {
    Wrist = 0,
    IndexMcp = 5,
    IndexTip = 8,
    MiddleMcp = 9,
    MiddleTip = 12,
    RingMcp = 13,
    RingTip = 16,
    PinkyMcp = 17,
    PinkyTip = 20,
}

impl HandJoint {
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// (tip, knuckle) pairs for the four non-thumb fingers.
const FINGERS: [(HandJoint, HandJoint); 4] = [
    (HandJoint::IndexTip, HandJoint::IndexMcp),
    (HandJoint::MiddleTip, HandJoint::MiddleMcp),
    (HandJoint::RingTip, HandJoint::RingMcp),
    (HandJoint::PinkyTip, HandJoint::PinkyMcp),
];

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Joint {
    pub x: f64,
    pub y: f64,
}

/// Landmarks for one processed frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GestureObservation {
    pub hand_present: bool,
    #[serde(default)]
    pub joints: Vec<Joint, JOINT_COUNT>,
}

impl GestureObservation {
    pub fn joint(&self, joint: HandJoint) -> Option<Joint> {
        self.joints.get(joint.index()).copied()
    }

    /// Vertical distance between the middle fingertip and the wrist.
    pub fn hand_span(&self) -> Option<f64> {
        let tip = self.joint(HandJoint::MiddleTip)?;
        let wrist = self.joint(HandJoint::Wrist)?;
        Some((tip.y - wrist.y).abs())
    }
}

/// A frame as delivered by the frame feed. `seq` is assigned by the reader.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub seq: u64,
    pub observation: GestureObservation,
    /// Image captured alongside the landmarks, if the vision side saved one.
    pub image: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy)]
pub struct GestureClassifier {
    min_hand_span: f64,
}

impl GestureClassifier {
    pub const fn new(min_hand_span: f64) -> Self {
        Self { min_hand_span }
    }

    pub fn min_hand_span(&self) -> f64 {
        self.min_hand_span
    }

    pub fn classify(&self, obs: &GestureObservation) -> bool {
        if !obs.hand_present || obs.joints.len() != JOINT_COUNT {
            return false;
        }

        let fingers_up = FINGERS.iter().all(|&(tip, mcp)| {
            obs.joints[tip.index()].y < obs.joints[mcp.index()].y
        });

        fingers_up
            && obs
                .hand_span()
                .is_some_and(|span| span > self.min_hand_span)
    }
}
