#[cfg(test)]
mod common;

#[cfg(test)]
mod auth_tests;

#[cfg(test)]
mod case_create_tests;

#[cfg(test)]
mod case_lifecycle_tests;

#[cfg(test)]
mod transfer_tests;


#[cfg(test)]
mod admin_tests;
