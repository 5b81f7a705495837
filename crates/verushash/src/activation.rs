//! Block-height schedule selecting the solution version, and from it the
//! hash variant, in force at a given height.

use crate::error::{Error, Result};
use crate::variant::Variant;

pub const MAX_HEIGHT: i32 = i32::MAX;
pub const NUM_VERSIONS: usize = 8;

pub const SOLUTION_VERUSV1: u32 = 0;
pub const SOLUTION_VERUSV2: u32 = 1;
pub const SOLUTION_VERUSV3: u32 = 2;
pub const SOLUTION_VERUSV4: u32 = 3;
pub const SOLUTION_VERUSV5: u32 = 4;
pub const SOLUTION_VERUSV5_1: u32 = 5;
pub const SOLUTION_VERUSV6: u32 = 6;
pub const SOLUTION_VERUSV7: u32 = 7;

pub const ACTIVATE_VERUSHASH2: u32 = SOLUTION_VERUSV2;
pub const ACTIVATE_EXTENDEDSOLUTION: u32 = SOLUTION_VERUSV3;
pub const ACTIVATE_IDENTITY: u32 = SOLUTION_VERUSV4;
pub const ACTIVATE_VERUSHASH2_1: u32 = SOLUTION_VERUSV4;
pub const ACTIVATE_EXTENDEDSTAKE: u32 = SOLUTION_VERUSV5;
pub const ACTIVATE_VERUSHASH2_2: u32 = SOLUTION_VERUSV5;
pub const ACTIVATE_PBAAS_HEADER: u32 = SOLUTION_VERUSV5_1;
pub const ACTIVATE_STAKEHEADER: u32 = SOLUTION_VERUSV6;
pub const ACTIVATE_VERUSVAULT: u32 = SOLUTION_VERUSV6;
pub const ACTIVATE_PBAAS: u32 = SOLUTION_VERUSV7;

/// Activation height of each solution version.
///
/// Version 0 is always active from genesis; every later version starts at
/// [`MAX_HEIGHT`] (never) until scheduled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationHeights {
    pub active: bool,
    pub heights: [i32; NUM_VERSIONS],
}

impl Default for ActivationHeights {
    fn default() -> Self {
        let mut heights = [MAX_HEIGHT; NUM_VERSIONS];
        heights[0] = 0;
        Self {
            active: true,
            heights,
        }
    }
}

impl ActivationHeights {
    fn check_version(version: u32) -> Result<usize> {
        if version == 0 || version as usize >= NUM_VERSIONS {
            return Err(Error::InvalidSolutionVersion(version));
        }
        Ok(version as usize)
    }

    /// Schedule `version` to activate at `height`.
    pub fn set_activation_height(&mut self, version: u32, height: i32) -> Result<()> {
        let idx = Self::check_version(version)?;
        if height < MAX_HEIGHT {
            self.active = true;
        }
        self.heights[idx] = height;
        Ok(())
    }

    pub fn is_activation_height(&self, version: u32, height: i32) -> Result<bool> {
        let idx = Self::check_version(version)?;
        Ok(self.active && self.heights[idx] == height)
    }

    /// Highest version whose activation height has been reached.
    pub fn active_version(&self, height: i32) -> u32 {
        if !self.active {
            return 0;
        }
        self.heights
            .iter()
            .take_while(|&&h| h <= height)
            .count()
            .saturating_sub(1) as u32
    }

    pub fn variant_at(&self, height: i32) -> Variant {
        Variant::for_solution_version(self.active_version(height))
    }
}
