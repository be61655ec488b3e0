use parseq::QueryRecord;

#[derive(QueryRecord)]
pub struct Outer {
    #[parseq(flatten)]
    #[query = "inner"]
    pub inner: Inner,
}

#[derive(Default, QueryRecord)]
pub struct Inner {
    pub n: u8,
}

fn main() {}
