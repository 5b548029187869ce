//! Test environment and unit tests



#[cfg(test)]
mod literal;


#[cfg(test)]
mod registry;
