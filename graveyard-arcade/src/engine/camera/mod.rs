//! Game camera, viewport classification and resize handling.

/// Portrait/landscape and mobile/desktop tuning of projection and fog.
pub mod viewport;
