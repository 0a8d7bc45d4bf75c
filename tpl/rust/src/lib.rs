pub struct Solution;

