//! The vehicle interface and its implementors.

use schemagen_core::{
    BuiltinScalar, FunctionDescriptor, Invocation, PropertyDescriptor, TypeDescriptor, TypeShape,
};
use serde_json::{Value, json};

pub const VEHICLE: &str = "sample.Vehicle";
pub const TRUCK: &str = "sample.Truck";
pub const SPORTSCAR: &str = "sample.Sportscar";

pub const VEHICLE_RESOLVER: &str = "sample.VehicleResolver";
pub const TRUCK_RESOLVER: &str = "sample.TruckResolver";
pub const SPORTSCAR_RESOLVER: &str = "sample.SportscarResolver";

#[derive(Debug, Default)]
pub struct VehicleResolver;

#[derive(Debug, Default)]
pub struct TruckResolver;

#[derive(Debug, Default)]
pub struct SportscarResolver;

fn string() -> TypeShape {
    TypeShape::builtin(BuiltinScalar::String)
}

fn move_function(noise: &'static str) -> FunctionDescriptor {
    FunctionDescriptor::new("move", string())
        .argument("meters", TypeShape::builtin(BuiltinScalar::Int))
        .resolve(move |_inv: Invocation| async move { Ok(Value::from(noise)) })
}

/// Each implementor answers `customResolver` with its own resolver.
fn custom_resolver(target: &str, answer: &'static str) -> FunctionDescriptor {
    FunctionDescriptor::new("customResolver", string())
        .argument("self", TypeShape::named(target))
        .resolve(move |_inv: Invocation| async move { Ok(Value::from(answer)) })
}

pub fn types() -> Vec<TypeDescriptor> {
    let vehicle = TypeDescriptor::interface(VEHICLE)
        .property(PropertyDescriptor::new("color", string()))
        .function(FunctionDescriptor::new("move", string()).argument("meters", TypeShape::builtin(BuiltinScalar::Int)));

    vec![
        TypeDescriptor::object(TRUCK)
            .function(move_function("Tuck tuck"))
            .implements(&vehicle),
        TypeDescriptor::object(SPORTSCAR)
            .function(move_function("Zshshhhh"))
            .implements(&vehicle),
        vehicle,
        TypeDescriptor::object(VEHICLE_RESOLVER).extends(VEHICLE).function(
            FunctionDescriptor::new("vehicle", TypeShape::named(VEHICLE))
                .argument("wantATruck", TypeShape::builtin(BuiltinScalar::Boolean))
                .query()
                .resolve(|inv: Invocation| async move {
                    let truck = inv.argument::<bool>("wantATruck")?;
                    Ok(if truck {
                        json!({ "__typename": "Truck", "color": "Yellow" })
                    } else {
                        json!({ "__typename": "Sportscar", "color": "Red" })
                    })
                }),
        ),
        TypeDescriptor::object(TRUCK_RESOLVER)
            .extends(TRUCK)
            .function(
                FunctionDescriptor::new("doSomeExtraNoise", string())
                    .resolve(|_inv: Invocation| async move { Ok(Value::from("RATATA")) }),
            )
            .function(custom_resolver(TRUCK, "Truck resolver")),
        TypeDescriptor::object(SPORTSCAR_RESOLVER)
            .extends(SPORTSCAR)
            .function(custom_resolver(SPORTSCAR, "Sportscar resolver")),
    ]
}
