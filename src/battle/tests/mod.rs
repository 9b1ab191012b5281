pub mod common;




#[cfg(test)]
mod test_trainers;

#[cfg(test)]
mod test_abilities;
