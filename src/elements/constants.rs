/// Standard gravitational parameter of the Earth (km^3/s^2)
pub const EARTH_MU_KM3_S2: f64 = 398_600.441_8;

/// Mean Earth radius used to turn altitudes into apsis distances (km)
pub const EARTH_MEAN_RADIUS_KM: f64 = 6371.0;
