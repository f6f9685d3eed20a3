//! The manipulator tool set.
//!
//! Wraps the `voxarm-hal` traits into [`Tool`] handlers the model can
//! invoke: joint/pose readout, point-to-point motion (gated by the safety
//! rules), gripper and servo control, FK/IK, and the reserved `shutdown`
//! termination tool.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tracing::info;
use voxarm_hal::driver::MotionGoal;
use voxarm_hal::servo::SERVO_ANGLE_RANGE;
use voxarm_hal::{Kinematics, RobotDriver, SafetyRules, Servo};
use voxarm_types::{ArmError, GripperState, Joints, Outcome, Pose, RobotState, ToolError};

use crate::registry::{ParamKind, ParamSpec, Tool, ToolRegistry};

/// Reserved tool name that terminates the session.
///
/// The session loop intercepts this name before dispatching a batch; the
/// handler below exists only so the tool appears in the catalog with a
/// proper description.
pub const SHUTDOWN_TOOL: &str = "shutdown";

/// Spoken when the model calls [`SHUTDOWN_TOOL`] without a reason.
pub const DEFAULT_SHUTDOWN_REASON: &str = "Shutting down as requested.";

// ─────────────────────────────────────────────────────────────────────────────
// Toolset wiring
// ─────────────────────────────────────────────────────────────────────────────

/// Bundle of hardware handles from which the full tool set is built.
#[derive(Clone)]
pub struct RobotToolset {
    pub driver: Arc<dyn RobotDriver>,
    pub kinematics: Arc<dyn Kinematics>,
    pub safety: Arc<dyn SafetyRules>,
    pub servo: Arc<dyn Servo>,
}

impl RobotToolset {
    pub fn new(
        driver: Arc<dyn RobotDriver>,
        kinematics: Arc<dyn Kinematics>,
        safety: Arc<dyn SafetyRules>,
        servo: Arc<dyn Servo>,
    ) -> Self {
        Self {
            driver,
            kinematics,
            safety,
            servo,
        }
    }

    /// Build a registry containing every manipulator tool, in the fixed
    /// order the catalog advertises them.
    pub fn into_registry(self) -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(GetJointPositions {
            driver: Arc::clone(&self.driver),
        }));
        registry.register(Arc::new(GetTcpPose {
            driver: Arc::clone(&self.driver),
            kinematics: Arc::clone(&self.kinematics),
        }));
        registry.register(Arc::new(GetState {
            driver: Arc::clone(&self.driver),
            kinematics: Arc::clone(&self.kinematics),
        }));
        registry.register(Arc::new(MoveP2p {
            driver: Arc::clone(&self.driver),
            kinematics: Arc::clone(&self.kinematics),
            safety: Arc::clone(&self.safety),
        }));
        registry.register(Arc::new(StopMotion {
            driver: Arc::clone(&self.driver),
        }));
        registry.register(Arc::new(SetGripper));
        registry.register(Arc::new(RunFk {
            kinematics: Arc::clone(&self.kinematics),
        }));
        registry.register(Arc::new(RunIk {
            kinematics: Arc::clone(&self.kinematics),
        }));
        registry.register(Arc::new(SetServoAngle {
            servo: Arc::clone(&self.servo),
        }));
        registry.register(Arc::new(Shutdown));
        registry
    }
}

/// Map a hardware-layer error into the tool outcome envelope.
fn arm_err(e: ArmError) -> ToolError {
    let code = match &e {
        ArmError::DriverFault { .. } => "driver_fault",
        ArmError::Kinematics(_) => "kinematics_error",
        ArmError::SafetyRejected(_) => "safety_rejected",
        ArmError::ServoFault(_) => "servo_error",
    };
    ToolError::new(code, e.to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Argument decoding helpers
// ─────────────────────────────────────────────────────────────────────────────

fn req_number(tool: &str, args: &Map<String, Value>, key: &str) -> Outcome<f64> {
    match args.get(key) {
        Some(v) => v
            .as_f64()
            .ok_or_else(|| ToolError::invalid_params(tool, format!("'{key}' must be a number"))),
        None => Err(ToolError::invalid_params(
            tool,
            format!("missing required parameter '{key}'"),
        )),
    }
}

fn opt_str<'a>(
    tool: &str,
    args: &'a Map<String, Value>,
    key: &str,
) -> Outcome<Option<&'a str>> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_str()
            .map(Some)
            .ok_or_else(|| ToolError::invalid_params(tool, format!("'{key}' must be a string"))),
    }
}

fn req_str<'a>(tool: &str, args: &'a Map<String, Value>, key: &str) -> Outcome<&'a str> {
    opt_str(tool, args, key)?.ok_or_else(|| {
        ToolError::invalid_params(tool, format!("missing required parameter '{key}'"))
    })
}

/// Fetch a structured argument, tolerating a JSON-encoded string (some
/// backends double-encode nested objects).
fn structured_arg(tool: &str, args: &Map<String, Value>, key: &str) -> Outcome<Option<Value>> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => serde_json::from_str(s).map(Some).map_err(|e| {
            ToolError::invalid_params(tool, format!("'{key}' is not valid JSON: {e}"))
        }),
        Some(v) => Ok(Some(v.clone())),
    }
}

/// Decode a [`Joints`] argument: either `{"values": [...]}` or a bare array.
fn joints_from(tool: &str, value: Value) -> Outcome<Joints> {
    if value.is_array() {
        return serde_json::from_value(json!({ "values": value }))
            .map_err(|e| ToolError::invalid_params(tool, e));
    }
    serde_json::from_value(value).map_err(|e| ToolError::invalid_params(tool, e))
}

fn pose_from(tool: &str, value: Value) -> Outcome<Pose> {
    serde_json::from_value(value).map_err(|e| ToolError::invalid_params(tool, e))
}

/// Read joints and run FK: the state snapshot used by several tools.
async fn read_state(
    driver: &dyn RobotDriver,
    kinematics: &dyn Kinematics,
) -> Result<RobotState, ArmError> {
    let joints = driver.read_joints().await?;
    let tcp = kinematics.fk(&joints).await?;
    Ok(RobotState {
        joints: Some(joints),
        tcp: Some(tcp),
        mode: "idle".to_string(),
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Readout tools
// ─────────────────────────────────────────────────────────────────────────────

struct GetJointPositions {
    driver: Arc<dyn RobotDriver>,
}

#[async_trait]
impl Tool for GetJointPositions {
    fn name(&self) -> &str {
        "get_joint_positions"
    }
    fn description(&self) -> &str {
        "Gets the current angular positions of all robot joints."
    }
    fn params(&self) -> &[ParamSpec] {
        &[]
    }
    async fn call(&self, _args: &Map<String, Value>) -> Outcome<Value> {
        let joints = self.driver.read_joints().await.map_err(arm_err)?;
        Ok(json!(joints))
    }
}

struct GetTcpPose {
    driver: Arc<dyn RobotDriver>,
    kinematics: Arc<dyn Kinematics>,
}

const TCP_POSE_PARAMS: &[ParamSpec] = &[ParamSpec::optional(
    "frame",
    ParamKind::String,
    "The reference coordinate frame, defaults to \"base\".",
)];

#[async_trait]
impl Tool for GetTcpPose {
    fn name(&self) -> &str {
        "get_tcp_pose"
    }
    fn description(&self) -> &str {
        "Gets the current Tool Center Point (TCP) pose relative to a coordinate frame."
    }
    fn params(&self) -> &[ParamSpec] {
        TCP_POSE_PARAMS
    }
    async fn call(&self, args: &Map<String, Value>) -> Outcome<Value> {
        let frame = opt_str(self.name(), args, "frame")?.unwrap_or("base");
        let joints = self.driver.read_joints().await.map_err(arm_err)?;
        let mut pose = self.kinematics.fk(&joints).await.map_err(arm_err)?;
        pose.frame = frame.to_string();
        Ok(json!(pose))
    }
}

struct GetState {
    driver: Arc<dyn RobotDriver>,
    kinematics: Arc<dyn Kinematics>,
}

#[async_trait]
impl Tool for GetState {
    fn name(&self) -> &str {
        "get_state"
    }
    fn description(&self) -> &str {
        "Retrieves the full current state of the robot (joints, pose, etc.)."
    }
    fn params(&self) -> &[ParamSpec] {
        &[]
    }
    async fn call(&self, _args: &Map<String, Value>) -> Outcome<Value> {
        let state = read_state(self.driver.as_ref(), self.kinematics.as_ref())
            .await
            .map_err(arm_err)?;
        Ok(json!(state))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Motion tools
// ─────────────────────────────────────────────────────────────────────────────

struct MoveP2p {
    driver: Arc<dyn RobotDriver>,
    kinematics: Arc<dyn Kinematics>,
    safety: Arc<dyn SafetyRules>,
}

const MOVE_P2P_PARAMS: &[ParamSpec] = &[
    ParamSpec::required(
        "target",
        ParamKind::String,
        "The destination: a Cartesian pose object {x,y,z,rx,ry,rz} or a joint set {values:[...]}.",
    ),
    ParamSpec::required("speed", ParamKind::Number, "The desired movement speed."),
    ParamSpec::required("accel", ParamKind::Number, "The desired movement acceleration."),
    ParamSpec::optional(
        "frame",
        ParamKind::String,
        "The reference frame if the target is a pose, defaults to \"base\".",
    ),
];

#[async_trait]
impl Tool for MoveP2p {
    fn name(&self) -> &str {
        "move_p2p"
    }
    fn description(&self) -> &str {
        "Moves the robot to a target point in a point-to-point (P2P) manner."
    }
    fn params(&self) -> &[ParamSpec] {
        MOVE_P2P_PARAMS
    }
    async fn call(&self, args: &Map<String, Value>) -> Outcome<Value> {
        let name = self.name();
        let target = structured_arg(name, args, "target")?.ok_or_else(|| {
            ToolError::invalid_params(name, "missing required parameter 'target'")
        })?;
        let speed = req_number(name, args, "speed")?;
        let accel = req_number(name, args, "accel")?;
        let frame = opt_str(name, args, "frame")?.unwrap_or("base").to_string();

        // A joint target carries "values"; anything else must parse as a pose.
        let goal = if target.get("values").is_some() || target.is_array() {
            MotionGoal::Joints(joints_from(name, target)?)
        } else {
            MotionGoal::Pose(pose_from(name, target)?)
        };

        let state = read_state(self.driver.as_ref(), self.kinematics.as_ref())
            .await
            .map_err(arm_err)?;
        self.safety
            .check_motion(&goal, &state)
            .await
            .map_err(arm_err)?;

        let handle = match goal {
            MotionGoal::Pose(pose) => self
                .driver
                .command_cartesian_goal(pose, speed, accel, &frame)
                .await
                .map_err(arm_err)?,
            MotionGoal::Joints(joints) => self
                .driver
                .command_joint_goal(joints, speed, accel)
                .await
                .map_err(arm_err)?,
        };
        Ok(json!(handle))
    }
}

struct StopMotion {
    driver: Arc<dyn RobotDriver>,
}

#[async_trait]
impl Tool for StopMotion {
    fn name(&self) -> &str {
        "stop"
    }
    fn description(&self) -> &str {
        "Stops all robot motion immediately."
    }
    fn params(&self) -> &[ParamSpec] {
        &[]
    }
    async fn call(&self, _args: &Map<String, Value>) -> Outcome<Value> {
        self.driver.stop().await.map_err(arm_err)?;
        Ok(json!({ "status": "stopped" }))
    }
}

struct SetGripper;

const SET_GRIPPER_PARAMS: &[ParamSpec] = &[
    ParamSpec::required(
        "state",
        ParamKind::String,
        "The desired state, either \"open\" or \"closed\".",
    ),
    ParamSpec::optional(
        "force",
        ParamKind::Number,
        "The grasping force to apply, if applicable.",
    ),
];

#[async_trait]
impl Tool for SetGripper {
    fn name(&self) -> &str {
        "set_gripper"
    }
    fn description(&self) -> &str {
        "Controls the gripper."
    }
    fn params(&self) -> &[ParamSpec] {
        SET_GRIPPER_PARAMS
    }
    async fn call(&self, args: &Map<String, Value>) -> Outcome<Value> {
        let raw = req_str(self.name(), args, "state")?;
        let state: GripperState = serde_json::from_value(json!(raw)).map_err(|_| {
            ToolError::invalid_params(
                self.name(),
                format!("'state' must be \"open\" or \"closed\", got '{raw}'"),
            )
        })?;
        let force = args.get("force").and_then(Value::as_f64);
        info!(?state, ?force, "gripper command");
        Ok(json!({ "status": "done", "state": state }))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Kinematics tools
// ─────────────────────────────────────────────────────────────────────────────

struct RunFk {
    kinematics: Arc<dyn Kinematics>,
}

const RUN_FK_PARAMS: &[ParamSpec] = &[ParamSpec::required(
    "joints",
    ParamKind::String,
    "Joint angles to evaluate, as {values:[...]}.",
)];

#[async_trait]
impl Tool for RunFk {
    fn name(&self) -> &str {
        "run_fk"
    }
    fn description(&self) -> &str {
        "Runs forward kinematics to calculate a pose from joint angles."
    }
    fn params(&self) -> &[ParamSpec] {
        RUN_FK_PARAMS
    }
    async fn call(&self, args: &Map<String, Value>) -> Outcome<Value> {
        let name = self.name();
        let raw = structured_arg(name, args, "joints")?.ok_or_else(|| {
            ToolError::invalid_params(name, "missing required parameter 'joints'")
        })?;
        let joints = joints_from(name, raw)?;
        let pose = self.kinematics.fk(&joints).await.map_err(arm_err)?;
        Ok(json!(pose))
    }
}

struct RunIk {
    kinematics: Arc<dyn Kinematics>,
}

const RUN_IK_PARAMS: &[ParamSpec] = &[
    ParamSpec::required(
        "pose",
        ParamKind::String,
        "Target pose to solve for, as {x,y,z,rx,ry,rz}.",
    ),
    ParamSpec::optional(
        "seed",
        ParamKind::String,
        "Optional joint seed {values:[...]} to bias the solver.",
    ),
];

#[async_trait]
impl Tool for RunIk {
    fn name(&self) -> &str {
        "run_ik"
    }
    fn description(&self) -> &str {
        "Runs inverse kinematics to find joint solutions for a given pose."
    }
    fn params(&self) -> &[ParamSpec] {
        RUN_IK_PARAMS
    }
    async fn call(&self, args: &Map<String, Value>) -> Outcome<Value> {
        let name = self.name();
        let raw = structured_arg(name, args, "pose")?
            .ok_or_else(|| ToolError::invalid_params(name, "missing required parameter 'pose'"))?;
        let pose = pose_from(name, raw)?;
        let seed = match structured_arg(name, args, "seed")? {
            Some(v) => Some(joints_from(name, v)?),
            None => None,
        };
        let solutions = self
            .kinematics
            .ik(&pose, seed.as_ref())
            .await
            .map_err(arm_err)?;
        Ok(json!(solutions))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Servo tool
// ─────────────────────────────────────────────────────────────────────────────

struct SetServoAngle {
    servo: Arc<dyn Servo>,
}

const SET_SERVO_PARAMS: &[ParamSpec] = &[ParamSpec::required(
    "angle",
    ParamKind::Number,
    "The desired angle for the servo, from 0 to 180 degrees.",
)];

#[async_trait]
impl Tool for SetServoAngle {
    fn name(&self) -> &str {
        "set_servo_angle"
    }
    fn description(&self) -> &str {
        "Sets the angle of a single servo motor."
    }
    fn params(&self) -> &[ParamSpec] {
        SET_SERVO_PARAMS
    }
    async fn call(&self, args: &Map<String, Value>) -> Outcome<Value> {
        // Models sometimes pass the angle as a string; coerce before the
        // range check so the error message stays about the range.
        let angle = match args.get("angle") {
            Some(Value::Number(n)) if n.as_i64().is_some() => n.as_i64().unwrap_or_default(),
            Some(Value::Number(n)) => n.as_f64().unwrap_or_default() as i64,
            Some(Value::String(s)) if s.trim().parse::<i64>().is_ok() => {
                s.trim().parse().unwrap_or_default()
            }
            other => {
                return Err(ToolError::new(
                    "invalid_angle",
                    format!(
                        "Angle must be a valid integer, but got '{}'.",
                        other.map(|v| v.to_string()).unwrap_or_default()
                    ),
                ));
            }
        };

        if !SERVO_ANGLE_RANGE.contains(&angle) {
            return Err(ToolError::new(
                "invalid_angle",
                "Angle must be between 0 and 180.",
            ));
        }

        // The servo link is blocking serial; keep it off the async workers.
        let servo = Arc::clone(&self.servo);
        let accepted = tokio::task::spawn_blocking(move || servo.set_angle(angle))
            .await
            .map_err(ToolError::execution_failed)?;

        if accepted {
            Ok(json!({ "status": "done" }))
        } else {
            Err(ToolError::new("servo_error", "Failed to set servo angle."))
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Termination tool
// ─────────────────────────────────────────────────────────────────────────────

struct Shutdown;

const SHUTDOWN_PARAMS: &[ParamSpec] = &[ParamSpec::optional(
    "reason",
    ParamKind::String,
    "The reason for shutting down, spoken to the user as the final summary.",
)];

#[async_trait]
impl Tool for Shutdown {
    fn name(&self) -> &str {
        SHUTDOWN_TOOL
    }
    fn description(&self) -> &str {
        "Initiates the shutdown of the application. Call this when the user's task is fully complete."
    }
    fn params(&self) -> &[ParamSpec] {
        SHUTDOWN_PARAMS
    }
    async fn call(&self, args: &Map<String, Value>) -> Outcome<Value> {
        // Intercepted by the session loop before dispatch; kept total so a
        // mis-routed call still yields a sensible payload.
        let reason = args
            .get("reason")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_SHUTDOWN_REASON);
        Ok(json!({ "status": "shutdown_initiated", "reason": reason }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxarm_hal::{MockServo, PermissiveSafety, SimDriver, SimKinematics};

    fn sim_registry() -> ToolRegistry {
        RobotToolset::new(
            Arc::new(SimDriver::new()),
            Arc::new(SimKinematics::new()),
            Arc::new(PermissiveSafety::new()),
            Arc::new(MockServo::new()),
        )
        .into_registry()
    }

    fn args(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn catalog_lists_all_tools_in_fixed_order() {
        let registry = sim_registry();
        let names: Vec<String> = registry
            .catalog()
            .iter()
            .map(|t| t["function"]["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "get_joint_positions",
                "get_tcp_pose",
                "get_state",
                "move_p2p",
                "stop",
                "set_gripper",
                "run_fk",
                "run_ik",
                "set_servo_angle",
                "shutdown",
            ]
        );
    }

    #[tokio::test]
    async fn get_joint_positions_returns_six_zeros() {
        let registry = sim_registry();
        let tool = registry.get("get_joint_positions").unwrap();
        let out = tool.call(&Map::new()).await.unwrap();
        assert_eq!(out["values"], json!(vec![0.0; 6]));
    }

    #[tokio::test]
    async fn get_tcp_pose_reports_sim_pose() {
        let registry = sim_registry();
        let tool = registry.get("get_tcp_pose").unwrap();
        let out = tool.call(&Map::new()).await.unwrap();
        assert_eq!(out["x"], 100.0);
        assert_eq!(out["frame"], "base");
    }

    #[tokio::test]
    async fn get_tcp_pose_honours_frame_argument() {
        let registry = sim_registry();
        let tool = registry.get("get_tcp_pose").unwrap();
        let out = tool
            .call(&args(&[("frame", json!("table"))]))
            .await
            .unwrap();
        assert_eq!(out["frame"], "table");
    }

    #[tokio::test]
    async fn run_fk_accepts_joint_object() {
        let registry = sim_registry();
        let tool = registry.get("run_fk").unwrap();
        let out = tool
            .call(&args(&[("joints", json!({ "values": vec![0.0; 6] }))]))
            .await
            .unwrap();
        assert_eq!(out["x"], 100.0);
    }

    #[tokio::test]
    async fn run_fk_accepts_json_encoded_string() {
        let registry = sim_registry();
        let tool = registry.get("run_fk").unwrap();
        let out = tool
            .call(&args(&[("joints", json!("{\"values\":[0,0,0,0,0,0]}"))]))
            .await
            .unwrap();
        assert_eq!(out["y"], 100.0);
    }

    #[tokio::test]
    async fn run_fk_rejects_missing_joints() {
        let registry = sim_registry();
        let tool = registry.get("run_fk").unwrap();
        let err = tool.call(&Map::new()).await.unwrap_err();
        assert_eq!(err.code, "invalid_params");
    }

    #[tokio::test]
    async fn run_ik_returns_solutions() {
        let registry = sim_registry();
        let tool = registry.get("run_ik").unwrap();
        let out = tool
            .call(&args(&[(
                "pose",
                json!({"x":100.0,"y":100.0,"z":100.0,"rx":0.0,"ry":0.0,"rz":0.0}),
            )]))
            .await
            .unwrap();
        assert_eq!(out[0]["values"], json!(vec![0.1; 6]));
    }

    #[tokio::test]
    async fn move_p2p_with_pose_target_returns_handle() {
        let registry = sim_registry();
        let tool = registry.get("move_p2p").unwrap();
        let out = tool
            .call(&args(&[
                (
                    "target",
                    json!({"x":10.0,"y":0.0,"z":5.0,"rx":0.0,"ry":0.0,"rz":0.0}),
                ),
                ("speed", json!(0.5)),
                ("accel", json!(0.2)),
            ]))
            .await
            .unwrap();
        assert!(out["handle_id"].as_str().unwrap().starts_with("sim-"));
    }

    #[tokio::test]
    async fn move_p2p_with_joint_target_returns_handle() {
        let registry = sim_registry();
        let tool = registry.get("move_p2p").unwrap();
        let out = tool
            .call(&args(&[
                ("target", json!({ "values": vec![0.1; 6] })),
                ("speed", json!(0.5)),
                ("accel", json!(0.2)),
            ]))
            .await
            .unwrap();
        assert!(out["handle_id"].as_str().unwrap().starts_with("sim-"));
    }

    #[tokio::test]
    async fn move_p2p_missing_speed_is_invalid_params() {
        let registry = sim_registry();
        let tool = registry.get("move_p2p").unwrap();
        let err = tool
            .call(&args(&[("target", json!({ "values": vec![0.0; 6] }))]))
            .await
            .unwrap_err();
        assert_eq!(err.code, "invalid_params");
        assert!(err.message.contains("speed"));
    }

    #[tokio::test]
    async fn set_gripper_rejects_unknown_state() {
        let registry = sim_registry();
        let tool = registry.get("set_gripper").unwrap();
        let err = tool
            .call(&args(&[("state", json!("ajar"))]))
            .await
            .unwrap_err();
        assert_eq!(err.code, "invalid_params");
    }

    #[tokio::test]
    async fn set_gripper_accepts_open() {
        let registry = sim_registry();
        let tool = registry.get("set_gripper").unwrap();
        let out = tool
            .call(&args(&[("state", json!("open"))]))
            .await
            .unwrap();
        assert_eq!(out["status"], "done");
    }

    #[tokio::test]
    async fn set_servo_angle_rejects_out_of_range() {
        let registry = sim_registry();
        let tool = registry.get("set_servo_angle").unwrap();
        let err = tool
            .call(&args(&[("angle", json!(999))]))
            .await
            .unwrap_err();
        assert_eq!(err.code, "invalid_angle");
        assert_eq!(err.message, "Angle must be between 0 and 180.");
    }

    #[tokio::test]
    async fn set_servo_angle_rejects_non_integer() {
        let registry = sim_registry();
        let tool = registry.get("set_servo_angle").unwrap();
        let err = tool
            .call(&args(&[("angle", json!("wide"))]))
            .await
            .unwrap_err();
        assert_eq!(err.code, "invalid_angle");
        assert!(err.message.contains("valid integer"));
    }

    #[tokio::test]
    async fn set_servo_angle_accepts_numeric_string() {
        let registry = sim_registry();
        let tool = registry.get("set_servo_angle").unwrap();
        let out = tool
            .call(&args(&[("angle", json!("45"))]))
            .await
            .unwrap();
        assert_eq!(out["status"], "done");
    }

    #[tokio::test]
    async fn stop_reports_stopped() {
        let registry = sim_registry();
        let tool = registry.get("stop").unwrap();
        let out = tool.call(&Map::new()).await.unwrap();
        assert_eq!(out["status"], "stopped");
    }

    #[tokio::test]
    async fn shutdown_echoes_reason() {
        let registry = sim_registry();
        let tool = registry.get(SHUTDOWN_TOOL).unwrap();
        let out = tool
            .call(&args(&[("reason", json!("Task complete."))]))
            .await
            .unwrap();
        assert_eq!(out["status"], "shutdown_initiated");
        assert_eq!(out["reason"], "Task complete.");
    }
}
