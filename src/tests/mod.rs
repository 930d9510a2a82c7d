mod test_utils;
mod random_round_trip;
