//! The Nomad allocation model, described ahead of time.
//!
//! This is a manually maintained mirror of the structs the Nomad HTTP API
//! returns from its allocation endpoints, expressed in the descriptor
//! language of [`super::Kind`]. Field and type names are copied verbatim
//! from the backend model; renaming one here is a breaking schema change.
//!
//! The mirror keeps the backend's awkward shapes on purpose: untyped task
//! driver configuration (`Task.Config`), header maps whose values are
//! string lists (`ServiceCheck.Header`), and timestamps inside task states.
//! The compiler decides what to do with each of them.

use super::{Catalog, Kind, TypeDef};
use Kind::*;

/// The type compiled for the `allocations` root field.
pub const ALLOCATION_LIST_STUB: &str = "AllocationListStub";

/// The type compiled for the `allocation` root field.
pub const ALLOCATION: &str = "Allocation";

fn ptr(inner: Kind) -> Kind {
	Kind::ptr(inner)
}

fn list(inner: Kind) -> Kind {
	Kind::list(inner)
}

fn map(value: Kind) -> Kind {
	Kind::map(value)
}

fn obj(name: &'static str) -> Kind {
	Struct(name)
}

/// Build the descriptor catalog for every type reachable from the two
/// allocation entry points.
pub fn catalog() -> Catalog {
	Catalog::new()
		.define(
			TypeDef::new(ALLOCATION_LIST_STUB)
				.field("ID", String)
				.field("EvalID", String)
				.field("Name", String)
				.field("Namespace", String)
				.field("NodeID", String)
				.field("NodeName", String)
				.field("JobID", String)
				.field("JobType", String)
				.field("JobVersion", Uint64)
				.field("TaskGroup", String)
				.field("AllocatedResources", ptr(obj("AllocatedResources")))
				.field("DesiredStatus", String)
				.field("DesiredDescription", String)
				.field("ClientStatus", String)
				.field("ClientDescription", String)
				.field("TaskStates", map(ptr(obj("TaskState"))))
				.field("DeploymentStatus", ptr(obj("AllocDeploymentStatus")))
				.field("FollowupEvalID", String)
				.field("RescheduleTracker", ptr(obj("RescheduleTracker")))
				.field("PreemptedAllocations", list(String))
				.field("PreemptedByAllocation", String)
				.field("CreateIndex", Uint64)
				.field("ModifyIndex", Uint64)
				.field("CreateTime", Int64)
				.field("ModifyTime", Int64),
		)
		.define(
			TypeDef::new(ALLOCATION)
				.field("ID", String)
				.field("Namespace", String)
				.field("EvalID", String)
				.field("Name", String)
				.field("NodeID", String)
				.field("NodeName", String)
				.field("JobID", String)
				.field("Job", ptr(obj("Job")))
				.field("TaskGroup", String)
				.field("Resources", ptr(obj("Resources")))
				.field("TaskResources", map(ptr(obj("Resources"))))
				.field("AllocatedResources", ptr(obj("AllocatedResources")))
				.field("Metrics", ptr(obj("AllocationMetric")))
				.field("DesiredStatus", String)
				.field("DesiredDescription", String)
				.field("DesiredTransition", obj("DesiredTransition"))
				.field("ClientStatus", String)
				.field("ClientDescription", String)
				.field("TaskStates", map(ptr(obj("TaskState"))))
				.field("DeploymentID", String)
				.field("DeploymentStatus", ptr(obj("AllocDeploymentStatus")))
				.field("FollowupEvalID", String)
				.field("PreviousAllocation", String)
				.field("NextAllocation", String)
				.field("RescheduleTracker", ptr(obj("RescheduleTracker")))
				.field("PreemptedAllocations", list(String))
				.field("PreemptedByAllocation", String)
				.field("CreateIndex", Uint64)
				.field("ModifyIndex", Uint64)
				.field("AllocModifyIndex", Uint64)
				.field("CreateTime", Int64)
				.field("ModifyTime", Int64),
		)
		.define(
			TypeDef::new("Job")
				.field("Region", ptr(String))
				.field("Namespace", ptr(String))
				.field("ID", ptr(String))
				.field("Name", ptr(String))
				.field("Type", ptr(String))
				.field("Priority", ptr(Int))
				.field("AllAtOnce", ptr(Bool))
				.field("Datacenters", list(String))
				.field("Constraints", list(ptr(obj("Constraint"))))
				.field("Affinities", list(ptr(obj("Affinity"))))
				.field("TaskGroups", list(ptr(obj("TaskGroup"))))
				.field("Stop", ptr(Bool))
				.field("ParentID", ptr(String))
				.field("Dispatched", Bool)
				.field("Meta", map(String))
				.field("ConsulToken", ptr(String))
				.field("VaultToken", ptr(String))
				.field("Status", ptr(String))
				.field("StatusDescription", ptr(String))
				.field("Stable", ptr(Bool))
				.field("Version", ptr(Uint64))
				.field("SubmitTime", ptr(Int64))
				.field("CreateIndex", ptr(Uint64))
				.field("ModifyIndex", ptr(Uint64))
				.field("JobModifyIndex", ptr(Uint64)),
		)
		.define(
			TypeDef::new("TaskGroup")
				.field("Name", ptr(String))
				.field("Count", ptr(Int))
				.field("Constraints", list(ptr(obj("Constraint"))))
				.field("Affinities", list(ptr(obj("Affinity"))))
				.field("Tasks", list(ptr(obj("Task"))))
				.field("RestartPolicy", ptr(obj("RestartPolicy")))
				.field("ReschedulePolicy", ptr(obj("ReschedulePolicy")))
				.field("EphemeralDisk", ptr(obj("EphemeralDisk")))
				.field("Meta", map(String))
				.field("Services", list(ptr(obj("Service"))))
				.field("Networks", list(ptr(obj("NetworkResource"))))
				.field("ShutdownDelay", ptr(Int64))
				.field("StopAfterClientDisconnect", ptr(Int64))
				.field("MaxClientDisconnect", ptr(Int64)),
		)
		.define(
			TypeDef::new("Task")
				.field("Name", String)
				.field("Driver", String)
				.field("User", String)
				// Driver configuration is an untyped map, which has no
				// query-language equivalent, so the compiler drops it.
				.field("Config", map(Any))
				.field("Constraints", list(ptr(obj("Constraint"))))
				.field("Affinities", list(ptr(obj("Affinity"))))
				.field("Env", map(String))
				.field("Services", list(ptr(obj("Service"))))
				.field("Resources", ptr(obj("Resources")))
				.field("RestartPolicy", ptr(obj("RestartPolicy")))
				.field("Meta", map(String))
				.field("KillTimeout", ptr(Int64))
				.field("LogConfig", ptr(obj("LogConfig")))
				.field("Artifacts", list(ptr(obj("TaskArtifact"))))
				.field("Leader", Bool)
				.field("ShutdownDelay", Int64)
				.field("KillSignal", String)
				.field("Kind", String),
		)
		.define(
			TypeDef::new("Service")
				.field("Name", String)
				.field("Tags", list(String))
				.field("CanaryTags", list(String))
				.field("EnableTagOverride", Bool)
				.field("PortLabel", String)
				.field("AddressMode", String)
				.field("Address", String)
				.field("Checks", list(obj("ServiceCheck")))
				.field("CheckRestart", ptr(obj("CheckRestart")))
				.field("Meta", map(String))
				.field("CanaryMeta", map(String))
				.field("TaggedAddresses", map(String))
				.field("TaskName", String)
				.field("OnUpdate", String)
				.field("Provider", String),
		)
		.define(
			TypeDef::new("ServiceCheck")
				.field("Name", String)
				.field("Type", String)
				.field("Command", String)
				.field("Args", list(String))
				.field("Path", String)
				.field("Protocol", String)
				.field("PortLabel", String)
				.field("Expose", Bool)
				.field("AddressMode", String)
				.field("Interval", Int64)
				.field("Timeout", Int64)
				.field("InitialStatus", String)
				.field("TLSSkipVerify", Bool)
				.field("Header", map(list(String)))
				.field("Method", String)
				.field("Body", String)
				.field("CheckRestart", ptr(obj("CheckRestart")))
				.field("GRPCService", String)
				.field("GRPCUseTLS", Bool)
				.field("TaskName", String)
				.field("SuccessBeforePassing", Int)
				.field("FailuresBeforeCritical", Int)
				.field("OnUpdate", String),
		)
		.define(
			TypeDef::new("CheckRestart")
				.field("Limit", Int)
				.field("Grace", ptr(Int64))
				.field("IgnoreWarnings", Bool),
		)
		.define(
			TypeDef::new("RestartPolicy")
				.field("Interval", ptr(Int64))
				.field("Attempts", ptr(Int))
				.field("Delay", ptr(Int64))
				.field("Mode", ptr(String)),
		)
		.define(
			TypeDef::new("ReschedulePolicy")
				.field("Attempts", ptr(Int))
				.field("Interval", ptr(Int64))
				.field("Delay", ptr(Int64))
				.field("DelayFunction", ptr(String))
				.field("MaxDelay", ptr(Int64))
				.field("Unlimited", ptr(Bool)),
		)
		.define(
			TypeDef::new("EphemeralDisk")
				.field("Sticky", ptr(Bool))
				.field("Migrate", ptr(Bool))
				.field("SizeMB", ptr(Int)),
		)
		.define(
			TypeDef::new("LogConfig")
				.field("MaxFiles", ptr(Int))
				.field("MaxFileSizeMB", ptr(Int))
				.field("Disabled", ptr(Bool)),
		)
		.define(
			TypeDef::new("TaskArtifact")
				.field("GetterSource", ptr(String))
				.field("GetterOptions", map(String))
				.field("GetterHeaders", map(String))
				.field("GetterMode", ptr(String))
				.field("RelativeDest", ptr(String)),
		)
		.define(
			TypeDef::new("Constraint")
				.field("LTarget", String)
				.field("RTarget", String)
				.field("Operand", String),
		)
		.define(
			TypeDef::new("Affinity")
				.field("LTarget", String)
				.field("RTarget", String)
				.field("Operand", String)
				.field("Weight", ptr(Int8)),
		)
		.define(
			TypeDef::new("Resources")
				.field("CPU", ptr(Int))
				.field("Cores", ptr(Int))
				.field("MemoryMB", ptr(Int))
				.field("MemoryMaxMB", ptr(Int))
				.field("DiskMB", ptr(Int))
				.field("Networks", list(ptr(obj("NetworkResource"))))
				.field("Devices", list(ptr(obj("RequestedDevice"))))
				.field("IOPS", ptr(Int)),
		)
		.define(
			TypeDef::new("RequestedDevice")
				.field("Name", String)
				.field("Count", ptr(Uint64))
				.field("Constraints", list(ptr(obj("Constraint"))))
				.field("Affinities", list(ptr(obj("Affinity")))),
		)
		.define(
			TypeDef::new("NetworkResource")
				.field("Mode", String)
				.field("Device", String)
				.field("CIDR", String)
				.field("IP", String)
				.field("Hostname", String)
				.field("MBits", ptr(Int))
				.field("DNS", ptr(obj("DNSConfig")))
				.field("ReservedPorts", list(obj("Port")))
				.field("DynamicPorts", list(obj("Port"))),
		)
		.define(
			TypeDef::new("DNSConfig")
				.field("Servers", list(String))
				.field("Searches", list(String))
				.field("Options", list(String)),
		)
		.define(
			TypeDef::new("Port")
				.field("Label", String)
				.field("Value", Int)
				.field("To", Int)
				.field("HostNetwork", String),
		)
		.define(
			TypeDef::new("PortMapping")
				.field("Label", String)
				.field("Value", Int)
				.field("To", Int)
				.field("HostIP", String),
		)
		.define(
			TypeDef::new("AllocatedResources")
				.field("Tasks", map(ptr(obj("AllocatedTaskResources"))))
				.field("Shared", obj("AllocatedSharedResources")),
		)
		.define(
			TypeDef::new("AllocatedTaskResources")
				.field("Cpu", obj("AllocatedCpuResources"))
				.field("Memory", obj("AllocatedMemoryResources"))
				.field("Networks", list(ptr(obj("NetworkResource")))),
		)
		.define(
			TypeDef::new("AllocatedCpuResources")
				.field("CpuShares", Int64)
				.field("ReservedCores", list(Uint16)),
		)
		.define(
			TypeDef::new("AllocatedMemoryResources")
				.field("MemoryMB", Int64)
				.field("MemoryMaxMB", Int64),
		)
		.define(
			TypeDef::new("AllocatedSharedResources")
				.field("DiskMB", Int64)
				.field("Networks", list(ptr(obj("NetworkResource"))))
				.field("Ports", list(obj("PortMapping"))),
		)
		.define(
			TypeDef::new("AllocationMetric")
				.field("NodesEvaluated", Int)
				.field("NodesFiltered", Int)
				.field("NodesAvailable", map(Int))
				.field("ClassFiltered", map(Int))
				.field("ConstraintFiltered", map(Int))
				.field("NodesExhausted", Int)
				.field("ClassExhausted", map(Int))
				.field("DimensionExhausted", map(Int))
				.field("QuotaExhausted", list(String))
				.field("Scores", map(Float64))
				.field("ScoreMetaData", list(ptr(obj("NodeScoreMeta"))))
				.field("AllocationTime", Int64)
				.field("CoalescedFailures", Int),
		)
		.define(
			TypeDef::new("NodeScoreMeta")
				.field("NodeID", String)
				.field("Scores", map(Float64))
				.field("NormScore", Float64),
		)
		.define(
			TypeDef::new("TaskState")
				.field("State", String)
				.field("Failed", Bool)
				.field("Restarts", Uint64)
				.field("LastRestart", Timestamp)
				.field("StartedAt", Timestamp)
				.field("FinishedAt", Timestamp)
				.field("Events", list(ptr(obj("TaskEvent")))),
		)
		.define(
			TypeDef::new("TaskEvent")
				.field("Type", String)
				.field("Time", Int64)
				.field("DisplayMessage", String)
				.field("Details", map(String))
				.field("Message", String)
				.field("FailsTask", Bool)
				.field("RestartReason", String)
				.field("SetupError", String)
				.field("DriverError", String)
				.field("DriverMessage", String)
				.field("ExitCode", Int)
				.field("Signal", Int)
				.field("KillError", String)
				.field("KillReason", String)
				.field("KillTimeout", Int64)
				.field("StartDelay", Int64)
				.field("DownloadError", String)
				.field("ValidationError", String)
				.field("DiskLimit", Int64)
				.field("FailedSibling", String)
				.field("VaultError", String)
				.field("TaskSignalReason", String)
				.field("TaskSignal", String)
				.field("GenericSource", String),
		)
		.define(
			TypeDef::new("AllocDeploymentStatus")
				.field("Healthy", ptr(Bool))
				.field("Timestamp", Timestamp)
				.field("Canary", Bool)
				.field("ModifyIndex", Uint64),
		)
		.define(TypeDef::new("RescheduleTracker").field("Events", list(ptr(obj("RescheduleEvent")))))
		.define(
			TypeDef::new("RescheduleEvent")
				.field("RescheduleTime", Int64)
				.field("PrevAllocID", String)
				.field("PrevNodeID", String),
		)
		.define(
			TypeDef::new("DesiredTransition")
				.field("Migrate", ptr(Bool))
				.field("Reschedule", ptr(Bool)),
		)
}

#[cfg(test)]
mod tests {
	use super::*;

	// Every struct reference in the catalog must have a definition, or
	// schema generation aborts at startup.
	#[test]
	fn every_struct_reference_resolves() {
		let catalog = catalog();
		let mut pending = vec![ALLOCATION_LIST_STUB, ALLOCATION];
		let mut seen = std::collections::BTreeSet::new();
		while let Some(name) = pending.pop() {
			if !seen.insert(name) {
				continue;
			}
			let def = catalog.get(name).unwrap_or_else(|| panic!("missing definition for {name}"));
			for fd in &def.fields {
				collect_refs(&fd.kind, &mut pending);
			}
		}
	}

	fn collect_refs(kind: &Kind, out: &mut Vec<&'static str>) {
		match kind {
			Struct(name) => out.push(*name),
			Ptr(inner) | List(inner) | Map(inner) => collect_refs(inner, out),
			_ => {}
		}
	}

	#[test]
	fn entry_points_are_defined() {
		let catalog = catalog();
		assert!(catalog.get(ALLOCATION_LIST_STUB).is_some());
		assert!(catalog.get(ALLOCATION).is_some());
	}
}
