macro_rules! pop {
	( $machine:expr, $( $x:ident ),* ) => (
		$(
			let $x = $machine.stack.pop()?;
		)*
	);
}

macro_rules! pop_u256 {
	( $machine:expr, $( $x:ident ),* ) => (
		$(
			let $x = $crate::utils::h256_to_u256($machine.stack.pop()?);
		)*
	);
}

macro_rules! push {
	( $machine:expr, $( $x:expr ),* ) => (
		$(
			$machine.stack.push($x)?;
		)*
	)
}

macro_rules! push_u256 {
	( $machine:expr, $( $x:expr ),* ) => (
		$(
			$machine.stack.push($crate::utils::u256_to_h256($x))?;
		)*
	)
}
