/// Bitrate estimation fed by the receiver reports of a [`RtpSource`](crate::RtpSource)
///
/// The source only measures loss and encodes the resulting target as TMMBR. The policy on how
/// loss translates into a bitrate lives in the implementation.
pub trait QualityManager: Send {
    /// Report the loss of the last interval, as fraction of 256
    fn set_target_bitrate(&mut self, fraction_lost: u8);

    /// Bitrate in bits/s the sender should be limited to, `<= 0` if there is no limit to request
    fn target_bitrate(&self) -> i32;

    /// Bounds for the target bitrate in bits/s
    fn set_min_max_bitrate(&mut self, min: i32, max: i32);
}
