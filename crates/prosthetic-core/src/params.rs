//! Physical parameters that can be perturbed between episodes.

/// Mass and length of the simulated limb.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatientParams {
    /// Point mass at the end of the limb (kg)
    pub mass: f32,
    /// Limb length (m)
    pub length: f32,
}

impl PatientParams {
    /// Nominal parameters (unit mass and length).
    pub const NOMINAL: Self = Self {
        mass: 1.0,
        length: 1.0,
    };

    /// Create parameters from mass and length.
    pub const fn new(mass: f32, length: f32) -> Self {
        Self { mass, length }
    }

    /// Ratio of these parameters to nominal, as (mass, length).
    pub fn relative_to(&self, nominal: &PatientParams) -> (f32, f32) {
        (self.mass / nominal.mass, self.length / nominal.length)
    }
}

impl Default for PatientParams {
    fn default() -> Self {
        Self::NOMINAL
    }
}

/// Direct mutable access to the physical constants of a simulator.
///
/// Implemented by the innermost simulator and forwarded by every wrapper so
/// that parameters can be written through a stack of wrappers.
pub trait PhysicalParams {
    /// Current physical parameters.
    fn patient_params(&self) -> PatientParams;

    /// Overwrite the physical parameters used by subsequent steps.
    fn set_patient_params(&mut self, params: PatientParams);
}

impl<P: PhysicalParams + ?Sized> PhysicalParams for Box<P> {
    fn patient_params(&self) -> PatientParams {
        (**self).patient_params()
    }

    fn set_patient_params(&mut self, params: PatientParams) {
        (**self).set_patient_params(params)
    }
}
