use leptos::prelude::*;

use crate::components::zigzag_graph::{GraphCommand, ZigzagGraph};
use crate::zigzag::Zig;

const COMMANDS: &[(&str, GraphCommand)] = &[
	("Zoom to fit", GraphCommand::ZoomToFit),
	("Auto layout", GraphCommand::AutoLayout),
	("Agitate", GraphCommand::Agitate),
	("Unlock all", GraphCommand::UnlockAll),
	("Save layout", GraphCommand::SaveViewState),
	("Reload", GraphCommand::Reload),
];

/// Key/value rows describing a selected device.
fn details(zig: &Zig) -> Vec<(&'static str, String)> {
	let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".into());
	vec![
		("Name", zig.display_name().to_owned()),
		("IEEE", zig.ieee.clone()),
		("Role", zig.device_type.to_string()),
		("LQI", zig.lqi.to_string()),
		("RSSI", zig.rssi.to_string()),
		("Available", zig.available.to_string()),
		("Power", or_dash(&zig.power_source)),
		("Manufacturer", or_dash(&zig.manufacturer)),
		("Model", or_dash(&zig.model)),
		("Area", or_dash(&zig.area_id)),
		("Last seen", zig.last_seen.clone()),
	]
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let command = RwSignal::new(None::<GraphCommand>);
	let (selected, set_selected) = signal(None::<Zig>);

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<ZigzagGraph command=command selected=set_selected fullscreen=true />
				<div class="graph-overlay">
					<h1>"Zigbee Network"</h1>
					<p class="subtitle">
						"Drag devices to pin them. Scroll to zoom. Drag background to pan."
					</p>
					<div class="graph-commands">
						{COMMANDS
							.iter()
							.map(|&(label, cmd)| {
								view! {
									<button on:click=move |_| command.set(Some(cmd))>{label}</button>
								}
							})
							.collect_view()}
					</div>
				</div>
				<Show when=move || selected.with(Option::is_some)>
					<div class="device-panel">
						<button on:click=move |_| set_selected.set(None)>"Close"</button>
						<dl>
							{move || {
								selected
									.get()
									.map(|zig| {
										details(&zig)
											.into_iter()
											.map(|(key, value)| view! {
												<dt>{key}</dt>
												<dd>{value}</dd>
											})
											.collect_view()
									})
							}}
						</dl>
					</div>
				</Show>
			</div>
		</ErrorBoundary>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::zigzag::model::ZigRole;

	#[test]
	fn details_fill_gaps() {
		let mut zig = Zig::placeholder("00:11", ZigRole::Router, 80);
		zig.area_id = None;
		let rows = details(&zig);
		assert!(rows.contains(&("Role", "Router".to_owned())));
		assert!(rows.contains(&("Area", "-".to_owned())));
		assert!(rows.contains(&("LQI", "80".to_owned())));
	}
}
