use super::{Orderer, OrdererEvent, OrderEarlyFn, NotifierFn};
use crate::resolution::{Resolution, Resolutions};

pub struct OrdererBuilder<'f> {
	resolutions: Resolutions,
	order_early: Option<OrderEarlyFn<'f>>,
	notifier: Option<NotifierFn<'f>>,
}

impl<'f> OrdererBuilder<'f> {
	pub fn new(resolutions: impl Into<Resolutions>) -> Self {
		Self {
			resolutions: resolutions.into(),
			order_early: None,
			notifier: None,
		}
	}

	/// Hint for ties in the ordering.
	///
	/// `Some(true)` orders the resolution as early as dependencies allow, `Some(false)` as late.
	/// Only consulted for resolutions that are not part of a cycle.
	pub fn order_early(mut self, order_early: impl Fn(&Resolution) -> Option<bool> + 'f) -> Self {
		self.order_early = Some(Box::new(order_early));
		self
	}

	/// Called at each stage and after each ordered component. Has no effect on the result.
	pub fn notifier(mut self, notifier: impl FnMut(OrdererEvent) + 'f) -> Self {
		self.notifier = Some(Box::new(notifier));
		self
	}

	pub fn build(self) -> Orderer<'f> {
		Orderer::new(
			self.resolutions,
			self.order_early.unwrap_or_else(|| Box::new(|_: &Resolution| None)),
			self.notifier.unwrap_or_else(|| Box::new(|_: OrdererEvent| {})),
		)
	}
}
