#[cfg(test)]
mod common;

#[cfg(test)]
mod capability_tests;
#[cfg(test)]
mod membership_tests;
#[cfg(test)]
mod project_tests;
#[cfg(test)]
mod session_tests;
