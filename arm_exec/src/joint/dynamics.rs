//! Joint dynamics calculations
//!
//! The link is a uniform rod on a pivot, driven through the gearbox by an
//! armature controlled DC motor. The torque balance gives
//!
//! ```text
//! acc = V * kv_term - vel * kd_term - gravity_torque / moi
//! ```
//!
//! where the first term is the torque from the applied voltage and the second
//! is the damping from the motor's back-EMF. The state is stepped with Euler
//! integration at a fixed cycle period.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;

// Internal
use super::*;
use crate::motor::MAX_VOLTAGE_V;
use util::maths::clamp;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Joint {
    /// Torque due to gravity about the pivot for a link at the given absolute
    /// angle from the horizontal.
    ///
    /// Units: newton meters
    pub fn gravity_torque_at(&self, abs_angle_rad: f64) -> f64 {
        self.mass_kg * GRAVITY_MS2 * (self.length_m / 2.0) * abs_angle_rad.cos()
    }

    /// Torque due to gravity at the joint's current angle.
    ///
    /// Units: newton meters
    pub fn gravity_torque(&self) -> f64 {
        self.gravity_torque_at(self.abs_angle_rad())
    }

    /// Angular acceleration produced per volt applied.
    pub fn kv_term(&self) -> f64 {
        (self.gear_ratio * self.kt_nm_per_a)
            / (self.motor.resistance_ohm * self.moi_kgm2)
    }

    /// Angular deceleration produced per radian/second of link velocity.
    pub fn kd_term(&self) -> f64 {
        (self.kt_nm_per_a * self.gear_ratio.powi(2))
            / (self.motor.kv_rads_per_v * self.motor.resistance_ohm * self.moi_kgm2)
    }

    /// Voltage which exactly holds the link still against gravity at its
    /// current angle.
    ///
    /// Units: volts
    pub fn feedforward_voltage(&self) -> f64 {
        (self.gravity_torque() * self.motor.resistance_ohm)
            / (self.kt_nm_per_a * self.gear_ratio)
    }

    /// Angular acceleration of the link for the given applied voltage at the
    /// current velocity and angle.
    ///
    /// Units: radians/second^2
    pub fn calc_acceleration(&self, voltage_v: f64) -> f64 {
        voltage_v * self.kv_term()
            - self.vel_rads * self.kd_term()
            - self.gravity_torque() / self.moi_kgm2
    }

    /// Step the joint forward by one cycle using the current voltage.
    ///
    /// The voltage is first limited to the supply voltage. While stopped the
    /// acceleration and velocity follow the joint's [`StopPolicy`], the angle
    /// is always integrated.
    pub fn update(&mut self) {
        self.voltage_v = clamp(self.voltage_v, -MAX_VOLTAGE_V, MAX_VOLTAGE_V);

        if self.stopped {
            if self.stop_policy == StopPolicy::Lock {
                self.acc_rads2 = 0.0;
                self.vel_rads = 0.0;
            }
        } else {
            self.acc_rads2 = self.calc_acceleration(self.voltage_v);
            self.vel_rads += self.acc_rads2 * self.cycle_period_s;
        }

        self.angle_rad += self.vel_rads * self.cycle_period_s;

        trace!(
            "Joint update: V = {:.3}, acc = {:.4}, vel = {:.4}, angle = {:.4}",
            self.voltage_v,
            self.acc_rads2,
            self.vel_rads,
            self.angle_rad
        );
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
