/// Items that are issued in a strictly increasing order.
pub trait SequentialId<T> {
    fn seq_id(&self) -> T;
}
