use parseq::QueryRecord;

#[derive(Default, QueryRecord)]
pub struct AllKinds {
    #[query = "s"]
    s: String,
    #[json = "b,omitempty"]
    b: bool,
    i: i32,
    u: u64,
    #[query = "tag"]
    tags: Vec<String>,
    #[query = "-"]
    excluded: String,
    unsupported: f64,
}

#[derive(Default, QueryRecord)]
pub struct Empty {}

#[derive(Default, QueryRecord)]
pub struct Embedding {
    #[parseq(flatten)]
    by_value: AllKinds,
    #[parseq(flatten)]
    boxed: Box<Empty>,
    #[parseq(flatten)]
    optional: Option<Box<AllKinds>>,
    #[parseq = "-"]
    legacy: String,
}

#[derive(QueryRecord)]
pub struct Generic<T>
where
    T: QueryRecord,
{
    #[parseq(flatten)]
    inner: T,
    #[query = "n"]
    n: u8,
}

fn main() {
    let mut record = Embedding::default();
    assert_eq!(record.fields().len(), 4);
}
