//! Component tests, one module per source file under src/components

mod test_center;
mod test_config;
mod test_mod;
mod test_notification;
mod test_permission;
mod test_schedule;
