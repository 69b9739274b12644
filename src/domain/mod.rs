// Domain layer: the student record, the ports the core depends on, and the
// validation rules. No storage or file format knowledge lives here.

pub mod model;
pub mod ports;
pub mod validation;
